//! # Analysis Module
//!
//! Streaming estimators over athlete telemetry.
//!
//! ## Submodules
//!
//! - `kinematics` - Per-tick numeric differentiation
//! - `events` - Event detection (HI distance, sprint, COD, impact)
//! - `respiration` - Beat-interval respiration estimation
//! - `features` - Feature vector for downstream HR/HRV models

pub mod events;
pub mod features;
pub mod kinematics;
pub mod respiration;
