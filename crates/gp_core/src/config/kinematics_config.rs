//! Kinematic Event Detector calibration

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Yards → meters.
pub const YARDS_TO_METERS: f64 = 0.9144;

/// Thresholds for high-intensity distance, sprint, COD and impact detection.
///
/// Speeds are in units/s, accelerations in units/s², durations in ms.
/// The unit is whatever the telemetry feed uses (yards by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsConfig {
    // === High Intensity ===
    /// Speed floor counted toward high-intensity distance (default: 6.56)
    pub hi_speed_threshold: f64,

    // === Sprint ===
    /// Speed at/above which a sprint episode begins (default: 6.56)
    pub sprint_enter_speed: f64,
    /// Exit speed = enter speed × this fraction (default: 0.8)
    pub sprint_exit_fraction: f64,
    /// Minimum episode length to count as a sprint (default: 400)
    pub sprint_min_duration_ms: i64,
    /// Minimum gap between confirmed sprints (default: 1500)
    pub sprint_cooldown_ms: i64,

    // === Change of Direction ===
    /// Minimum speed for COD evaluation (default: 3.0)
    pub cod_min_speed: f64,
    /// Angular-rate threshold in °/s (default: 90.0)
    pub cod_turn_rate_dps: f64,
    /// Acceleration-magnitude threshold (default: 2.0)
    pub cod_lat_accel: f64,
    /// Minimum gap between confirmed CODs (default: 600)
    pub cod_cooldown_ms: i64,

    // === Impact ===
    /// Acceleration-magnitude threshold (default: 3.0)
    pub impact_accel_threshold: f64,
    /// Minimum gap between confirmed impacts (default: 800)
    pub impact_cooldown_ms: i64,

    /// Wrap heading differences into (-180, 180] before computing turn rate.
    /// Off by default (raw subtraction).
    pub normalize_turn_rate: bool,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            hi_speed_threshold: 6.56,

            sprint_enter_speed: 6.56,
            sprint_exit_fraction: 0.8,
            sprint_min_duration_ms: 400,
            sprint_cooldown_ms: 1500,

            cod_min_speed: 3.0,
            cod_turn_rate_dps: 90.0,
            cod_lat_accel: 2.0,
            cod_cooldown_ms: 600,

            impact_accel_threshold: 3.0,
            impact_cooldown_ms: 800,

            normalize_turn_rate: false,
        }
    }
}

impl KinematicsConfig {
    /// Defaults expressed for feeds reporting meters.
    pub fn metric() -> Self {
        Self::default().scaled(YARDS_TO_METERS)
    }

    /// Rescale every distance-based threshold by `factor`.
    /// Durations and the angular threshold are unit-free and stay as-is.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            hi_speed_threshold: self.hi_speed_threshold * factor,
            sprint_enter_speed: self.sprint_enter_speed * factor,
            cod_min_speed: self.cod_min_speed * factor,
            cod_lat_accel: self.cod_lat_accel * factor,
            impact_accel_threshold: self.impact_accel_threshold * factor,
            ..self.clone()
        }
    }

    /// Speed below which an active sprint ends.
    #[inline]
    pub fn sprint_exit_speed(&self) -> f64 {
        self.sprint_enter_speed * self.sprint_exit_fraction
    }

    pub fn validate(&self) -> Result<()> {
        positive("hi_speed_threshold", self.hi_speed_threshold)?;
        positive("sprint_enter_speed", self.sprint_enter_speed)?;
        if !(self.sprint_exit_fraction > 0.0 && self.sprint_exit_fraction <= 1.0) {
            return Err(CoreError::invalid(
                "sprint_exit_fraction",
                format!("must be in (0, 1], got {}", self.sprint_exit_fraction),
            ));
        }
        non_negative_ms("sprint_min_duration_ms", self.sprint_min_duration_ms)?;
        non_negative_ms("sprint_cooldown_ms", self.sprint_cooldown_ms)?;
        positive("cod_min_speed", self.cod_min_speed)?;
        positive("cod_turn_rate_dps", self.cod_turn_rate_dps)?;
        positive("cod_lat_accel", self.cod_lat_accel)?;
        non_negative_ms("cod_cooldown_ms", self.cod_cooldown_ms)?;
        positive("impact_accel_threshold", self.impact_accel_threshold)?;
        non_negative_ms("impact_cooldown_ms", self.impact_cooldown_ms)?;
        Ok(())
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::invalid(field, format!("must be finite and > 0, got {}", value)))
    }
}

fn non_negative_ms(field: &'static str, value: i64) -> Result<()> {
    if value >= 0 {
        Ok(())
    } else {
        Err(CoreError::invalid(field, format!("must be >= 0 ms, got {}", value)))
    }
}
