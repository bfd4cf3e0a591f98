//! Per-entity beat-interval history feeding the respiration estimator.

use fxhash::FxHashMap;
use tracing::warn;

use super::estimator::estimate_with;
use crate::config::RespirationConfig;
use crate::models::{EntityId, RespirationEstimate};

/// Growing (optionally bounded) beat history in the estimator's
/// `timestamps` / `intervals` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatHistory {
    timestamps: Vec<f64>,
    intervals: Vec<f64>,
    capacity: Option<usize>,
}

impl BeatHistory {
    pub fn new(session_start: f64) -> Self {
        Self { timestamps: vec![session_start], intervals: Vec::new(), capacity: None }
    }

    /// Keep at most `capacity` paired samples; older ones are dropped and
    /// the oldest retained timestamp becomes the new session start.
    pub fn with_capacity(session_start: f64, capacity: usize) -> Self {
        Self { capacity: Some(capacity.max(1)), ..Self::new(session_start) }
    }

    /// Append the beat ending at `timestamp`. Non-finite values and
    /// timestamps that do not advance are rejected.
    pub fn push(&mut self, timestamp: f64, interval: f64) -> bool {
        let last = self.timestamps[self.timestamps.len() - 1];
        if !(timestamp.is_finite() && interval.is_finite()) || timestamp <= last {
            return false;
        }
        self.timestamps.push(timestamp);
        self.intervals.push(interval);

        if let Some(cap) = self.capacity {
            let excess = self.intervals.len().saturating_sub(cap);
            if excess > 0 {
                self.timestamps.drain(..excess);
                self.intervals.drain(..excess);
            }
        }
        true
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    pub fn session_start(&self) -> f64 {
        self.timestamps[0]
    }

    /// Paired samples held.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn estimate(&self, cfg: &RespirationConfig) -> Option<RespirationEstimate> {
        estimate_with(&self.timestamps, &self.intervals, cfg)
    }
}

/// Beat histories keyed by entity, recomputing an estimate on every beat.
#[derive(Debug, Clone, Default)]
pub struct RespirationTracker {
    config: RespirationConfig,
    histories: FxHashMap<EntityId, BeatHistory>,
}

impl RespirationTracker {
    pub fn new() -> Self {
        Self::with_config(RespirationConfig::default())
    }

    pub fn with_config(config: RespirationConfig) -> Self {
        Self { config, histories: FxHashMap::default() }
    }

    pub fn config(&self) -> &RespirationConfig {
        &self.config
    }

    /// Start (or restart) an entity's session.
    pub fn start_session(&mut self, entity: EntityId, session_start: f64) {
        let history = match self.config.history_capacity {
            Some(cap) => BeatHistory::with_capacity(session_start, cap),
            None => BeatHistory::new(session_start),
        };
        self.histories.insert(entity, history);
    }

    /// Record a beat and recompute. An entity without a session gets one
    /// starting at the previous beat, `timestamp - interval`.
    pub fn push(
        &mut self,
        entity: &EntityId,
        timestamp: f64,
        interval: f64,
    ) -> Option<RespirationEstimate> {
        if !self.histories.contains_key(entity) {
            self.start_session(entity.clone(), timestamp - interval);
        }
        let history = self.histories.get_mut(entity)?;
        if !history.push(timestamp, interval) {
            warn!(%entity, timestamp, interval, "beat rejected: non-finite or not after previous beat");
            return None;
        }
        history.estimate(&self.config)
    }

    /// Estimate from the stored history without adding a beat.
    pub fn estimate(&self, entity: &EntityId) -> Option<RespirationEstimate> {
        self.histories.get(entity)?.estimate(&self.config)
    }

    pub fn history(&self, entity: &EntityId) -> Option<&BeatHistory> {
        self.histories.get(entity)
    }

    pub fn evict(&mut self, entity: &EntityId) -> Option<BeatHistory> {
        self.histories.remove(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.histories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::respiration::estimator::tests::modulated_beats;

    #[test]
    fn test_history_layout() {
        let mut h = BeatHistory::new(0.0);
        assert!(h.push(1.0, 1.0));
        assert!(h.push(1.9, 0.9));
        assert_eq!(h.timestamps(), &[0.0, 1.0, 1.9]);
        assert_eq!(h.intervals(), &[1.0, 0.9]);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_rejects_non_advancing_beats() {
        let mut h = BeatHistory::new(5.0);
        assert!(!h.push(5.0, 1.0));
        assert!(!h.push(6.0, f64::NAN));
        assert!(h.push(6.0, 1.0));
        assert!(!h.push(5.5, 1.0));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_capacity_advances_session_start() {
        let mut h = BeatHistory::with_capacity(0.0, 2);
        h.push(1.0, 1.0);
        h.push(2.0, 1.0);
        h.push(3.0, 1.0);
        assert_eq!(h.timestamps(), &[1.0, 2.0, 3.0]);
        assert_eq!(h.intervals(), &[1.0, 1.0]);
        assert_eq!(h.session_start(), 1.0);
    }

    #[test]
    fn test_unbounded_history_matches_stateless_estimate() {
        let (ts, rr) = modulated_beats(90.0, 0.25);
        let cfg = RespirationConfig { window_s: 100.0, ..RespirationConfig::default() };

        let mut tracker = RespirationTracker::with_config(cfg.clone());
        let id = EntityId::from("7");
        tracker.start_session(id.clone(), ts[0]);
        let mut last = None;
        for (t, r) in ts[1..].iter().zip(rr.iter()) {
            last = tracker.push(&id, *t, *r);
        }

        let direct = estimate_with(&ts, &rr, &cfg);
        assert!(direct.is_some());
        assert_eq!(last, direct);
        assert_eq!(tracker.estimate(&id), direct);
    }

    #[test]
    fn test_implicit_session_start() {
        let mut tracker = RespirationTracker::new();
        let id = EntityId::from("3");
        assert!(tracker.push(&id, 10.0, 0.8).is_none());
        let h = tracker.history(&id).unwrap();
        assert!((h.session_start() - 9.2).abs() < 1e-12);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_entities_do_not_mix() {
        let mut tracker = RespirationTracker::new();
        let a = EntityId::from("a");
        let b = EntityId::from("b");
        tracker.start_session(a.clone(), 0.0);
        tracker.start_session(b.clone(), 100.0);
        tracker.push(&a, 1.0, 1.0);
        tracker.push(&b, 101.0, 1.0);
        assert_eq!(tracker.history(&a).unwrap().timestamps(), &[0.0, 1.0]);
        assert_eq!(tracker.history(&b).unwrap().timestamps(), &[100.0, 101.0]);
        assert!(tracker.evict(&a).is_some());
        assert_eq!(tracker.entity_count(), 1);
    }
}
