//! Replay Library
//!
//! Offline ingestion loop for gp_core:
//! telemetry CSV → KinematicDetector → JSON lines
//! beat-interval CSV → RespirationTracker → JSON lines

pub mod beat_replay;
pub mod telemetry_replay;

use anyhow::{Context, Result};
use gp_core::AnalyticsConfig;
use std::fs;
use std::path::Path;

pub use beat_replay::{replay_beats, replay_beats_file, BeatReplaySummary};
pub use telemetry_replay::{
    replay_telemetry, replay_telemetry_file, EntitySummary, TelemetryReplaySummary,
};

/// Row-level parse statistics shared by both replays.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParseStats {
    pub total_rows: u64,
    pub parsed: u64,
    pub failed: u64,
}

/// Unit preset selecting the calibration defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Preset {
    /// Feed in yards (default)
    #[default]
    Yards,
    /// Feed in meters
    Metric,
}

/// Load a calibration file (`.yaml`/`.yml` or `.json`); without a file the
/// preset's defaults are used.
pub fn load_config(path: Option<&Path>, preset: Preset) -> Result<AnalyticsConfig> {
    let Some(path) = path else {
        return Ok(match preset {
            Preset::Yards => AnalyticsConfig::yards(),
            Preset::Metric => AnalyticsConfig::metric(),
        });
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let config = if is_json {
        AnalyticsConfig::from_json_str(&text)
    } else {
        AnalyticsConfig::from_yaml_str(&text)
    }
    .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Treat NaN/inf as a missing reading.
pub(crate) fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}
