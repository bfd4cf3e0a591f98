//! # Physiological Feature Vector
//!
//! Builds the 7-value input vector consumed by the HR/HRV regressors.
//! Names and order are a fixed contract with the model-serving layer.

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{EntityId, TickResult};

/// Feature names in model input order.
pub const PHYSIO_FEATURE_NAMES: [&str; 7] = [
    "Vitesse",
    "Acceleration",
    "Distance_HI_inc",
    "Sprint_inc",
    "COD_inc",
    "Impact_inc",
    "elapsed_time_sec",
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PhysioFeatures {
    #[serde(rename = "Vitesse")]
    pub speed: f64,
    #[serde(rename = "Acceleration")]
    pub acceleration: f64,
    #[serde(rename = "Distance_HI_inc")]
    pub distance_hi_inc: f64,
    #[serde(rename = "Sprint_inc")]
    pub sprint_inc: f64,
    #[serde(rename = "COD_inc")]
    pub cod_inc: f64,
    #[serde(rename = "Impact_inc")]
    pub impact_inc: f64,
    #[serde(rename = "elapsed_time_sec")]
    pub elapsed_time_sec: f64,
}

impl PhysioFeatures {
    /// Values in [`PHYSIO_FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; 7] {
        [
            self.speed,
            self.acceleration,
            self.distance_hi_inc,
            self.sprint_inc,
            self.cod_inc,
            self.impact_inc,
            self.elapsed_time_sec,
        ]
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }
}

/// Tracks each entity's first tick so elapsed time can be derived.
#[derive(Debug, Clone, Default)]
pub struct FeatureAccumulator {
    first_seen_ms: FxHashMap<EntityId, i64>,
}

impl FeatureAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, tick: &TickResult) -> PhysioFeatures {
        let start = *self.first_seen_ms.entry(tick.entity_id.clone()).or_insert(tick.timestamp);
        PhysioFeatures {
            speed: tick.speed,
            acceleration: tick.acceleration_magnitude,
            distance_hi_inc: tick.high_intensity_distance_step,
            sprint_inc: flag(tick.sprint_detected),
            cod_inc: flag(tick.cod_detected),
            impact_inc: flag(tick.impact_detected),
            elapsed_time_sec: (tick.timestamp - start) as f64 / 1000.0,
        }
    }

    pub fn evict(&mut self, id: &EntityId) {
        self.first_seen_ms.remove(id);
    }
}

#[inline]
fn flag(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::events::KinematicDetector;
    use crate::models::TelemetrySample;

    #[test]
    fn test_serialized_names_match_contract() {
        let json = serde_json::to_value(PhysioFeatures::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), PHYSIO_FEATURE_NAMES.len());
        for name in PHYSIO_FEATURE_NAMES {
            assert!(obj.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_features_from_detector_stream() {
        let mut det = KinematicDetector::new();
        let mut acc = FeatureAccumulator::new();

        let frames = [
            TelemetrySample::new(2000, "9", (0.0, 0.0)).with_speed(7.0),
            TelemetrySample::new(2500, "9", (3.5, 0.0)).with_speed(7.0),
        ];
        let feats: Vec<_> = frames.iter().map(|f| acc.ingest(&det.update(f))).collect();

        assert_eq!(feats[0].elapsed_time_sec, 0.0);
        assert_eq!(feats[0].distance_hi_inc, 0.0);

        let v = feats[1].to_array();
        assert_eq!(v[0], 7.0);
        assert!((v[2] - 3.5).abs() < 1e-9);
        assert!((v[6] - 0.5).abs() < 1e-12);
        // Constant 7 units/s along the heading: no acceleration, no events
        assert!(v[1].abs() < 1e-9);
        assert_eq!(&v[3..6], &[0.0, 0.0, 0.0]);
    }
}
