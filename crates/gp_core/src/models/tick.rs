//! Per-tick detector output

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::telemetry::{EntityId, TelemetrySample};

/// Metrics emitted by the kinematic detector for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TickResult {
    pub timestamp: i64,
    pub entity_id: EntityId,
    /// Distance covered this tick at/above the high-speed threshold, else 0
    pub high_intensity_distance_step: f64,
    pub high_intensity_distance_cumulative: f64,
    /// True only on the tick a sprint is confirmed (episode exit)
    pub sprint_detected: bool,
    pub sprint_count: u32,
    pub cod_detected: bool,
    pub cod_count: u32,
    pub impact_detected: bool,
    pub impact_count: u32,
    /// Sample speed after defaulting
    pub speed: f64,
    /// Euclidean norm of the derived acceleration; 0 on an entity's first tick
    pub acceleration_magnitude: f64,
}

impl TickResult {
    /// Neutral result for an entity's first sample.
    pub fn first_tick(sample: &TelemetrySample) -> Self {
        Self {
            timestamp: sample.timestamp,
            entity_id: sample.entity_id.clone(),
            high_intensity_distance_step: 0.0,
            high_intensity_distance_cumulative: 0.0,
            sprint_detected: false,
            sprint_count: 0,
            cod_detected: false,
            cod_count: 0,
            impact_detected: false,
            impact_count: 0,
            speed: sample.speed_or_zero(),
            acceleration_magnitude: 0.0,
        }
    }

    /// Any discrete event fired on this tick.
    pub fn any_event(&self) -> bool {
        self.sprint_detected || self.cod_detected || self.impact_detected
    }
}
