use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Windowed respiration estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespirationEstimate {
    /// Seconds; mean timestamp of the full paired history
    pub center_timestamp: f64,
    pub breaths_per_minute: f64,
}

impl From<RespirationEstimate> for (f64, f64) {
    fn from(e: RespirationEstimate) -> Self {
        (e.center_timestamp, e.breaths_per_minute)
    }
}
