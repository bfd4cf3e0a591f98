//! # Respiration Module
//!
//! Respiration-rate estimation from beat-to-beat (RR) intervals.
//!
//! - `resample` - Uniform grid + linear interpolation
//! - `spectral` - Detrending and Welch PSD
//! - `estimator` - Windowed respiration estimate
//! - `history` - Per-entity beat history and tracker

pub mod estimator;
pub mod history;
pub mod resample;
pub mod spectral;

pub use estimator::{estimate, estimate_with, RespirationEstimator};
pub use history::{BeatHistory, RespirationTracker};
