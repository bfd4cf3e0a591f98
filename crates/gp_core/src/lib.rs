//! # gp_core - Realtime Athlete Analytics
//!
//! Two independent streaming estimators for player-tracking feeds:
//!
//! - [`KinematicDetector`]: one call per telemetry tick, per-entity state,
//!   emits high-intensity distance and sprint / change-of-direction / impact
//!   events with hysteresis and cooldown gating.
//! - [`estimate`] / [`RespirationTracker`]: windowed spectral respiration
//!   rate from beat-to-beat intervals.
//!
//! Both are pure computation: no I/O, no global state. Each detector
//! instance owns its entities; different entities never interact.
//!
//! ```rust
//! use gp_core::{KinematicDetector, TelemetrySample};
//!
//! let mut detector = KinematicDetector::new();
//! detector.update(&TelemetrySample::new(0, "12", (0.0, 0.0)).with_speed(7.0));
//! let tick = detector.update(&TelemetrySample::new(500, "12", (3.5, 0.0)).with_speed(7.0));
//! assert!((tick.high_intensity_distance_step - 3.5).abs() < 1e-9);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;

pub use analysis::events::{EntityState, KinematicDetector};
pub use analysis::features::{FeatureAccumulator, PhysioFeatures, PHYSIO_FEATURE_NAMES};
pub use analysis::respiration::{
    estimate, estimate_with, BeatHistory, RespirationEstimator, RespirationTracker,
};
pub use config::{AnalyticsConfig, KinematicsConfig, RespirationConfig, ResampleSource};
pub use error::{CoreError, Result};
pub use models::{EntityId, Position, RespirationEstimate, TelemetrySample, TickResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
