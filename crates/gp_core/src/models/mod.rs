//! Data model shared by the estimators.
//!
//! Wire names are camelCase to match the ingestion feed.

pub mod respiration;
pub mod telemetry;
pub mod tick;

pub use respiration::RespirationEstimate;
pub use telemetry::{EntityId, Position, TelemetrySample};
pub use tick::TickResult;
