//! Beat-interval CSV replay
//!
//! Expected header: `entityId,timestamp,interval` (seconds).
//! A row with an empty interval starts (or restarts) that entity's session;
//! every other row is one beat and triggers a recomputation. Rows with a
//! non-finite timestamp or interval are counted as failed and skipped.

use anyhow::{Context, Result};
use gp_core::{EntityId, RespirationConfig, RespirationEstimate, RespirationTracker};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

use crate::{finite, ParseStats};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BeatRow {
    entity_id: String,
    timestamp: f64,
    #[serde(default)]
    interval: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateLine<'a> {
    entity_id: &'a EntityId,
    #[serde(flatten)]
    estimate: RespirationEstimate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatReplaySummary {
    pub stats: ParseStats,
    pub sessions: u64,
    pub beats: u64,
    pub estimates: u64,
}

pub fn replay_beats<R: Read, W: Write>(
    input: R,
    mut output: W,
    tracker: &mut RespirationTracker,
) -> Result<BeatReplaySummary> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut summary = BeatReplaySummary::default();

    for (line, row) in reader.deserialize::<BeatRow>().enumerate() {
        summary.stats.total_rows += 1;
        let row = match row {
            Ok(row) if row.timestamp.is_finite() => row,
            Ok(row) => {
                summary.stats.failed += 1;
                warn!(line = line + 2, timestamp = row.timestamp, "skipping beat row");
                continue;
            }
            Err(e) => {
                summary.stats.failed += 1;
                warn!(line = line + 2, error = %e, "skipping beat row");
                continue;
            }
        };
        let entity = EntityId(row.entity_id);
        let Some(raw_interval) = row.interval else {
            summary.stats.parsed += 1;
            debug!(%entity, start = row.timestamp, "session start");
            tracker.start_session(entity, row.timestamp);
            summary.sessions += 1;
            continue;
        };
        let Some(interval) = finite(Some(raw_interval)) else {
            summary.stats.failed += 1;
            warn!(line = line + 2, %entity, interval = raw_interval, "skipping beat row");
            continue;
        };
        summary.stats.parsed += 1;
        summary.beats += 1;
        if let Some(estimate) = tracker.push(&entity, row.timestamp, interval) {
            summary.estimates += 1;
            serde_json::to_writer(&mut output, &EstimateLine { entity_id: &entity, estimate })?;
            output.write_all(b"\n")?;
        }
    }
    output.flush()?;
    Ok(summary)
}

pub fn replay_beats_file(
    input: &Path,
    output: Option<&Path>,
    config: RespirationConfig,
) -> Result<BeatReplaySummary> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open beat CSV: {}", input.display()))?;
    let mut tracker = RespirationTracker::with_config(config);

    match output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            replay_beats(file, io::BufWriter::new(out), &mut tracker)
        }
        None => replay_beats(file, io::stdout().lock(), &mut tracker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn synthetic_csv() -> String {
        let mut csv = String::from("entityId,timestamp,interval\n");
        for id in ["a", "b"] {
            writeln!(csv, "{},0,", id).unwrap();
        }
        // Beats with RR modulated at 0.25 Hz, interleaved entities
        let mut t = 0.0f64;
        while t < 100.0 {
            let rr = 0.9 + 0.08 * (2.0 * std::f64::consts::PI * 0.25 * t).sin();
            t += rr;
            writeln!(csv, "a,{},{}", t, rr).unwrap();
            writeln!(csv, "b,{},1.0", t).unwrap();
        }
        csv
    }

    #[test]
    fn test_replay_emits_estimates_for_modulated_entity_only() {
        let cfg = RespirationConfig { window_s: 120.0, ..RespirationConfig::default() };
        let mut tracker = RespirationTracker::with_config(cfg);
        let mut out = Vec::new();
        let summary = replay_beats(synthetic_csv().as_bytes(), &mut out, &mut tracker).unwrap();

        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.stats.failed, 0);
        assert!(summary.estimates > 0);

        let text = String::from_utf8(out).unwrap();
        let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert_eq!(last["entityId"], "a");
        let bpm = last["breathsPerMinute"].as_f64().unwrap();
        assert!((bpm - 15.0).abs() <= 1.0, "got {}", bpm);
        // Entity b has constant intervals: never a rate
        assert!(text.lines().all(|l| !l.contains("\"entityId\":\"b\"")));
    }

    #[test]
    fn test_bad_rows_skipped() {
        let csv = "entityId,timestamp,interval\na,0,\na,x,1.0\na,NaN,1.0\na,1.0,1.0\n";
        let mut tracker = RespirationTracker::new();
        let summary = replay_beats(csv.as_bytes(), io::sink(), &mut tracker).unwrap();
        assert_eq!(summary.stats.total_rows, 4);
        assert_eq!(summary.stats.failed, 2);
        assert_eq!(summary.beats, 1);
        assert_eq!(tracker.history(&EntityId::from("a")).unwrap().len(), 1);
    }

    #[test]
    fn test_non_finite_interval_keeps_session() {
        let csv = "entityId,timestamp,interval\na,0,\na,1.0,1.0\na,2.0,1.0\na,3.0,1.0\n\
                   a,4.0,NaN\na,5.0,inf\n";
        let mut tracker = RespirationTracker::new();
        let summary = replay_beats(csv.as_bytes(), io::sink(), &mut tracker).unwrap();

        assert_eq!(summary.sessions, 1);
        assert_eq!(summary.beats, 3);
        assert_eq!(summary.stats.failed, 2);
        assert_eq!(summary.stats.parsed, 4);

        let history = tracker.history(&EntityId::from("a")).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.session_start(), 0.0);
    }
}
