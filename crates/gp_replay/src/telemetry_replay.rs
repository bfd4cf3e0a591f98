//! Telemetry CSV replay
//!
//! Expected header: `timestamp,entityId,x,y,speed,direction`
//! - `timestamp` integer milliseconds
//! - `speed` / `direction` may be empty or non-finite (treated as missing)
//!
//! Each row becomes one JSON line holding the tick result, optionally
//! followed by the 7-value physiological feature vector.

use anyhow::{Context, Result};
use gp_core::{
    EntityId, FeatureAccumulator, KinematicDetector, KinematicsConfig, Position, TelemetrySample,
    TickResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::{finite, ParseStats};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TelemetryRow {
    timestamp: i64,
    entity_id: String,
    x: f64,
    y: f64,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default, alias = "heading")]
    direction: Option<f64>,
}

impl TelemetryRow {
    fn into_sample(self) -> TelemetrySample {
        TelemetrySample {
            timestamp: self.timestamp,
            entity_id: EntityId(self.entity_id),
            position: Position::new(self.x, self.y),
            speed: finite(self.speed),
            heading: finite(self.direction),
        }
    }
}

#[derive(Serialize)]
struct TickLine<'a> {
    #[serde(flatten)]
    tick: &'a TickResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<[f64; 7]>,
}

/// Final per-entity totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub ticks: u64,
    pub sprint_count: u32,
    pub cod_count: u32,
    pub impact_count: u32,
    pub high_intensity_distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetryReplaySummary {
    pub stats: ParseStats,
    pub entities: BTreeMap<EntityId, EntitySummary>,
}

/// Stream telemetry rows from `input` through `detector`, writing JSON lines
/// to `output`. Malformed rows are counted and skipped.
pub fn replay_telemetry<R: Read, W: Write>(
    input: R,
    mut output: W,
    detector: &mut KinematicDetector,
    with_features: bool,
) -> Result<TelemetryReplaySummary> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut features = FeatureAccumulator::new();
    let mut summary = TelemetryReplaySummary::default();

    for (line, row) in reader.deserialize::<TelemetryRow>().enumerate() {
        summary.stats.total_rows += 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                summary.stats.failed += 1;
                warn!(line = line + 2, error = %e, "skipping telemetry row");
                continue;
            }
        };
        summary.stats.parsed += 1;

        let tick = detector.update(&row.into_sample());
        let feature_vec = with_features.then(|| features.ingest(&tick).to_array());
        serde_json::to_writer(&mut output, &TickLine { tick: &tick, features: feature_vec })?;
        output.write_all(b"\n")?;

        let entry = summary.entities.entry(tick.entity_id.clone()).or_default();
        entry.ticks += 1;
        entry.sprint_count = tick.sprint_count;
        entry.cod_count = tick.cod_count;
        entry.impact_count = tick.impact_count;
        entry.high_intensity_distance = tick.high_intensity_distance_cumulative;
    }
    output.flush()?;

    for (id, s) in &summary.entities {
        info!(
            entity = %id,
            ticks = s.ticks,
            sprints = s.sprint_count,
            cods = s.cod_count,
            impacts = s.impact_count,
            hi_distance = s.high_intensity_distance,
            "entity summary"
        );
    }
    Ok(summary)
}

/// File-based wrapper; `output = None` writes to stdout.
pub fn replay_telemetry_file(
    input: &Path,
    output: Option<&Path>,
    config: KinematicsConfig,
    with_features: bool,
) -> Result<TelemetryReplaySummary> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open telemetry CSV: {}", input.display()))?;
    let mut detector = KinematicDetector::with_config(config);

    match output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            replay_telemetry(file, BufWriter::new(out), &mut detector, with_features)
        }
        None => replay_telemetry(file, io::stdout().lock(), &mut detector, with_features),
    }
}
