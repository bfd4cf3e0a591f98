//! Respiration Frequency Estimator parameters

use serde::{Deserialize, Serialize};

use super::kinematics_config::positive;
use crate::error::{CoreError, Result};

/// Which beat samples feed the interpolator before resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleSource {
    /// Only the samples inside the sliding window (extrapolated across the
    /// rest of the grid)
    #[default]
    Window,
    /// Every paired sample of the history
    FullHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespirationConfig {
    /// Uniform resampling rate in Hz (default: 4.0)
    pub sample_rate_hz: f64,
    /// Sliding window length in seconds (default: 10.0)
    pub window_s: f64,
    /// Lower edge of the respiration band in Hz (default: 0.1)
    pub band_min_hz: f64,
    /// Upper edge of the respiration band in Hz (default: 0.5)
    pub band_max_hz: f64,
    /// Welch segment length cap (default: 256)
    pub max_segment_len: usize,
    /// Interpolation input (default: window)
    pub resample_source: ResampleSource,
    /// Paired beat samples retained per entity; `None` keeps everything
    pub history_capacity: Option<usize>,
}

impl Default for RespirationConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 4.0,
            window_s: 10.0,
            band_min_hz: 0.1,
            band_max_hz: 0.5,
            max_segment_len: 256,
            resample_source: ResampleSource::Window,
            history_capacity: None,
        }
    }
}

impl RespirationConfig {
    pub fn validate(&self) -> Result<()> {
        positive("sample_rate_hz", self.sample_rate_hz)?;
        positive("window_s", self.window_s)?;
        if !(self.band_min_hz.is_finite() && self.band_min_hz >= 0.0) {
            return Err(CoreError::invalid(
                "band_min_hz",
                format!("must be finite and >= 0, got {}", self.band_min_hz),
            ));
        }
        if !(self.band_max_hz.is_finite() && self.band_max_hz > self.band_min_hz) {
            return Err(CoreError::invalid(
                "band_max_hz",
                format!("must exceed band_min_hz ({}), got {}", self.band_min_hz, self.band_max_hz),
            ));
        }
        if self.max_segment_len == 0 {
            return Err(CoreError::invalid("max_segment_len", "must be > 0"));
        }
        if self.history_capacity == Some(0) {
            return Err(CoreError::invalid("history_capacity", "must be > 0 when set"));
        }
        Ok(())
    }
}
