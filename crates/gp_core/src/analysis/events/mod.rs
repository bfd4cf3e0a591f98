//! # Event Detection Module
//!
//! Streaming detection of discrete motion events from per-tick telemetry.
//!
//! - `cooldown` - Cooldown-gated event counter
//! - `sprint_tracker` - Sprint hysteresis state machine
//! - `kinematic_detector` - Per-entity detector (HI distance, sprint, COD, impact)

pub mod cooldown;
pub mod kinematic_detector;
pub mod sprint_tracker;

pub use cooldown::EventGate;
pub use kinematic_detector::{EntityState, KinematicDetector};
pub use sprint_tracker::{SprintPhase, SprintTracker};
