//! # Respiration Frequency Estimator
//!
//! Instantaneous respiration rate from a beat-interval history.
//!
//! ## Algorithm
//! 1. Pair `timestamps[1..]` with `intervals` (the first timestamp is the
//!    session start and has no interval)
//! 2. Keep the samples with timestamp >= latest - window (need >= 2)
//! 3. Linearly interpolate onto a uniform `fs` grid spanning the full paired
//!    history, extrapolating at the edges
//! 4. Require >= floor(fs × window / 2) resampled points
//! 5. Linear detrend, Welch PSD with segment length min(256, n)
//! 6. Strongest bin in [0.1, 0.5] Hz → breaths/min
//!
//! The returned center timestamp is the mean of the full paired history,
//! not of the window.
//!
//! Every early exit is `None`; the function is pure and never panics on
//! short input.

use tracing::trace;

use super::resample::{interp_linear, uniform_grid};
use super::spectral::{detrend_linear, welch_psd};
use crate::config::{RespirationConfig, ResampleSource};
use crate::models::RespirationEstimate;

/// Estimate with the default band and segment cap.
pub fn estimate(
    timestamps: &[f64],
    intervals: &[f64],
    sample_rate_hz: f64,
    window_s: f64,
) -> Option<RespirationEstimate> {
    let cfg = RespirationConfig { sample_rate_hz, window_s, ..RespirationConfig::default() };
    estimate_with(timestamps, intervals, &cfg)
}

/// Estimate with a full parameter set.
pub fn estimate_with(
    timestamps: &[f64],
    intervals: &[f64],
    cfg: &RespirationConfig,
) -> Option<RespirationEstimate> {
    if timestamps.len() < 2 {
        trace!(len = timestamps.len(), "respiration: fewer than 2 timestamps");
        return None;
    }

    let n = (timestamps.len() - 1).min(intervals.len());
    if n == 0 {
        trace!("respiration: no paired intervals");
        return None;
    }
    let paired_t = &timestamps[1..=n];
    let paired_rr = &intervals[..n];

    let now = paired_t[n - 1];
    let first = paired_t.partition_point(|&t| t < now - cfg.window_s);
    let (win_t, win_rr) = (&paired_t[first..], &paired_rr[first..]);
    if win_t.len() < 2 {
        trace!(selected = win_t.len(), "respiration: window holds fewer than 2 samples");
        return None;
    }

    let grid = uniform_grid(paired_t[0], now, cfg.sample_rate_hz);
    let resampled = match cfg.resample_source {
        ResampleSource::Window => interp_linear(win_t, win_rr, &grid),
        ResampleSource::FullHistory => interp_linear(paired_t, paired_rr, &grid),
    };

    let min_len = (cfg.sample_rate_hz * cfg.window_s / 2.0).floor();
    if resampled.is_empty() || (resampled.len() as f64) < min_len {
        trace!(len = resampled.len(), min_len, "respiration: resampled series too short");
        return None;
    }

    let detrended = detrend_linear(&resampled);
    let psd = welch_psd(&detrended, cfg.sample_rate_hz, cfg.max_segment_len)?;

    let (freq, power) = match psd.peak_in_band(cfg.band_min_hz, cfg.band_max_hz) {
        Some(peak) => peak,
        None => {
            trace!("respiration: no frequency bin inside the band");
            return None;
        }
    };
    if !(power.is_finite() && power > 0.0) {
        trace!(power, "respiration: flat spectrum in band");
        return None;
    }

    let center_timestamp = paired_t.iter().sum::<f64>() / n as f64;
    Some(RespirationEstimate { center_timestamp, breaths_per_minute: freq * 60.0 })
}

/// Configured estimator; a thin handle over [`estimate_with`].
#[derive(Debug, Clone, Default)]
pub struct RespirationEstimator {
    config: RespirationConfig,
}

impl RespirationEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RespirationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RespirationConfig {
        &self.config
    }

    pub fn estimate(&self, timestamps: &[f64], intervals: &[f64]) -> Option<RespirationEstimate> {
        estimate_with(timestamps, intervals, &self.config)
    }
}
