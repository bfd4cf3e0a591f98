//! # Kinematic Event Detector
//!
//! Per-tick, per-entity streaming detector for high-intensity distance,
//! sprints, changes of direction (COD) and impacts.
//!
//! ## Algorithm (entity-scoped, previous vs current sample)
//! 1. First sample of an entity only seeds its state; metrics are neutral
//! 2. Derive dt, velocity, acceleration and turn rate ([`MotionDelta`])
//! 3. HI step = speed × dt when speed >= HI threshold
//! 4. Sprint hysteresis FSM ([`SprintTracker`])
//! 5. COD (level-triggered): speed >= COD min speed AND
//!    (|turn rate| >= threshold OR |a| >= lateral threshold), cooldown-gated
//! 6. Impact (level-triggered, any speed): |a| >= threshold, cooldown-gated
//! 7. Persist timestamp, position, speed and heading unconditionally
//!
//! State is owned by the detector; nothing is shared between entities.

use fxhash::FxHashMap;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use super::cooldown::EventGate;
use super::sprint_tracker::SprintTracker;
use crate::analysis::kinematics::{MotionAnchor, MotionDelta};
use crate::config::KinematicsConfig;
use crate::models::{EntityId, Position, TelemetrySample, TickResult};

/// Motion history and event sub-states of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    last: MotionAnchor,
    hi_distance_cumulative: f64,
    sprint: SprintTracker,
    cod: EventGate,
    impact: EventGate,
}

impl EntityState {
    /// Seed state from an entity's first sample.
    pub fn from_first_sample(sample: &TelemetrySample) -> Self {
        Self {
            last: anchor_of(sample),
            hi_distance_cumulative: 0.0,
            sprint: SprintTracker::new(),
            cod: EventGate::new(),
            impact: EventGate::new(),
        }
    }

    /// Process a follow-up sample for this entity.
    pub fn advance(&mut self, sample: &TelemetrySample, cfg: &KinematicsConfig) -> TickResult {
        let ts = sample.timestamp;
        let speed = sample.speed_or_zero();
        let heading = sample.heading_or_zero();

        let delta =
            MotionDelta::between(&self.last, ts, sample.position, heading, cfg.normalize_turn_rate);
        if delta.clamped {
            warn!(
                entity = %sample.entity_id,
                last_ts = self.last.timestamp,
                ts,
                "non-increasing timestamp, dt clamped"
            );
        }
        let accel = delta.acceleration_magnitude();

        // High intensity distance
        let hi_step = if speed >= cfg.hi_speed_threshold { speed * delta.dt_s } else { 0.0 };
        self.hi_distance_cumulative += hi_step;

        // Sprint
        let sprint_detected = self.sprint.step(ts, speed, cfg);

        // Change of direction
        let cod_detected = speed >= cfg.cod_min_speed
            && (delta.turn_rate.abs() >= cfg.cod_turn_rate_dps || accel >= cfg.cod_lat_accel)
            && self.cod.try_fire(ts, cfg.cod_cooldown_ms);

        // Impact
        let impact_detected =
            accel >= cfg.impact_accel_threshold && self.impact.try_fire(ts, cfg.impact_cooldown_ms);

        if sprint_detected || cod_detected || impact_detected {
            debug!(
                entity = %sample.entity_id,
                ts,
                sprint = sprint_detected,
                cod = cod_detected,
                impact = impact_detected,
                accel,
                turn_rate = delta.turn_rate,
                "kinematic event"
            );
        }

        self.last = anchor_of(sample);

        TickResult {
            timestamp: ts,
            entity_id: sample.entity_id.clone(),
            high_intensity_distance_step: hi_step,
            high_intensity_distance_cumulative: self.hi_distance_cumulative,
            sprint_detected,
            sprint_count: self.sprint.count(),
            cod_detected,
            cod_count: self.cod.count(),
            impact_detected,
            impact_count: self.impact.count(),
            speed,
            acceleration_magnitude: accel,
        }
    }

    pub fn last_timestamp(&self) -> i64 {
        self.last.timestamp
    }

    pub fn last_position(&self) -> Position {
        self.last.position
    }

    pub fn last_speed(&self) -> f64 {
        self.last.speed
    }

    pub fn last_heading(&self) -> f64 {
        self.last.heading
    }

    pub fn high_intensity_distance(&self) -> f64 {
        self.hi_distance_cumulative
    }

    pub fn in_sprint(&self) -> bool {
        self.sprint.in_sprint()
    }

    pub fn sprint_enter_timestamp(&self) -> Option<i64> {
        self.sprint.entered_ms()
    }

    pub fn last_sprint_event_timestamp(&self) -> Option<i64> {
        self.sprint.last_event_ms()
    }

    pub fn sprint_count(&self) -> u32 {
        self.sprint.count()
    }

    pub fn last_cod_event_timestamp(&self) -> Option<i64> {
        self.cod.last_event_ms()
    }

    pub fn cod_count(&self) -> u32 {
        self.cod.count()
    }

    pub fn last_impact_event_timestamp(&self) -> Option<i64> {
        self.impact.last_event_ms()
    }

    pub fn impact_count(&self) -> u32 {
        self.impact.count()
    }
}

fn anchor_of(sample: &TelemetrySample) -> MotionAnchor {
    MotionAnchor {
        timestamp: sample.timestamp,
        position: sample.position,
        speed: sample.speed_or_zero(),
        heading: sample.heading_or_zero(),
    }
}

/// Run one sample against an entity slot; an empty slot takes the
/// first-sample path.
fn process(
    slot: &mut Option<EntityState>,
    sample: &TelemetrySample,
    cfg: &KinematicsConfig,
) -> TickResult {
    match slot {
        Some(state) => state.advance(sample, cfg),
        None => {
            trace!(entity = %sample.entity_id, ts = sample.timestamp, "new entity");
            *slot = Some(EntityState::from_first_sample(sample));
            TickResult::first_tick(sample)
        }
    }
}

/// Owner of all per-entity state. Entities are created lazily on their
/// first sample and live until evicted or the detector is dropped.
#[derive(Debug, Clone, Default)]
pub struct KinematicDetector {
    config: KinematicsConfig,
    entities: FxHashMap<EntityId, EntityState>,
}

impl KinematicDetector {
    pub fn new() -> Self {
        Self::with_config(KinematicsConfig::default())
    }

    pub fn with_config(config: KinematicsConfig) -> Self {
        Self { config, entities: FxHashMap::default() }
    }

    pub fn config(&self) -> &KinematicsConfig {
        &self.config
    }

    /// Process one sample. Never fails.
    pub fn update(&mut self, sample: &TelemetrySample) -> TickResult {
        match self.entities.get_mut(&sample.entity_id) {
            Some(state) => state.advance(sample, &self.config),
            None => {
                trace!(entity = %sample.entity_id, ts = sample.timestamp, "new entity");
                self.entities
                    .insert(sample.entity_id.clone(), EntityState::from_first_sample(sample));
                TickResult::first_tick(sample)
            }
        }
    }

    /// Process a batch. Each entity's samples run in input order on a rayon
    /// worker; results come back in input order and equal sequential
    /// `update` calls.
    pub fn update_batch(&mut self, samples: &[TelemetrySample]) -> Vec<TickResult> {
        let mut group_of: FxHashMap<&EntityId, usize> = FxHashMap::default();
        let mut groups: Vec<(EntityId, Option<EntityState>, Vec<usize>)> = Vec::new();

        for (idx, sample) in samples.iter().enumerate() {
            let g = *group_of.entry(&sample.entity_id).or_insert_with(|| {
                let state = self.entities.remove(&sample.entity_id);
                groups.push((sample.entity_id.clone(), state, Vec::new()));
                groups.len() - 1
            });
            groups[g].2.push(idx);
        }

        let cfg = &self.config;
        let per_group: Vec<Vec<(usize, TickResult)>> = groups
            .par_iter_mut()
            .map(|(_, slot, indices)| {
                indices.iter().map(|&i| (i, process(slot, &samples[i], cfg))).collect()
            })
            .collect();

        for (id, slot, _) in groups {
            if let Some(state) = slot {
                self.entities.insert(id, state);
            }
        }

        let mut ordered: Vec<Option<TickResult>> = vec![None; samples.len()];
        for (i, result) in per_group.into_iter().flatten() {
            ordered[i] = Some(result);
        }
        ordered.into_iter().flatten().collect()
    }

    /// Read-only lookup; `None` until the entity's first sample.
    pub fn entity_state(&self, id: &EntityId) -> Option<&EntityState> {
        self.entities.get(id)
    }

    /// Drop an entity's history; its next sample starts from scratch.
    pub fn evict(&mut self, id: &EntityId) -> Option<EntityState> {
        self.entities.remove(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.keys()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: i64, id: &str, x: f64, y: f64, speed: f64, heading: f64) -> TelemetrySample {
        TelemetrySample::new(ts, id, (x, y)).with_speed(speed).with_heading(heading)
    }

    /// Straight run along x at constant speed; no acceleration after the
    /// first tick so only speed-driven logic fires.
    fn straight(id: &str, profile: &[(i64, f64)]) -> Vec<TelemetrySample> {
        let mut x = 0.0;
        let mut last_ts = profile[0].0;
        profile
            .iter()
            .map(|&(ts, speed)| {
                x += speed * (ts - last_ts) as f64 / 1000.0;
                last_ts = ts;
                sample(ts, id, x, 0.0, speed, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_first_sample_is_neutral() {
        let mut det = KinematicDetector::new();
        let r = det.update(&sample(0, "1", 0.0, 0.0, 9.0, 45.0));
        assert_eq!(r.high_intensity_distance_step, 0.0);
        assert_eq!(r.high_intensity_distance_cumulative, 0.0);
        assert!(!r.any_event());
        assert_eq!((r.sprint_count, r.cod_count, r.impact_count), (0, 0, 0));
        assert_eq!(r.acceleration_magnitude, 0.0);

        let state = det.entity_state(&EntityId::from("1")).unwrap();
        assert!(!state.in_sprint(), "first sample never enters a sprint");
        assert_eq!(state.last_speed(), 9.0);
    }

    #[test]
    fn test_high_intensity_distance() {
        let mut det = KinematicDetector::new();
        det.update(&sample(0, "1", 0.0, 0.0, 7.0, 0.0));
        let r = det.update(&sample(500, "1", 3.5, 0.0, 7.0, 0.0));
        assert!((r.high_intensity_distance_step - 3.5).abs() < 1e-9);
        assert!((r.high_intensity_distance_cumulative - 3.5).abs() < 1e-9);

        let r = det.update(&sample(1000, "1", 7.0, 0.0, 7.0, 0.0));
        assert!((r.high_intensity_distance_cumulative - 7.0).abs() < 1e-9);

        let r = det.update(&sample(1500, "1", 9.0, 0.0, 4.0, 0.0));
        assert_eq!(r.high_intensity_distance_step, 0.0);
        assert!((r.high_intensity_distance_cumulative - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_sprint_399ms_rejected_400ms_accepted() {
        let mut det = KinematicDetector::new();
        for s in straight("short", &[(0, 2.0), (100, 7.0), (300, 7.0), (499, 4.0)]) {
            let r = det.update(&s);
            assert!(!r.sprint_detected);
        }
        let st = det.entity_state(&EntityId::from("short")).unwrap();
        assert_eq!(st.sprint_count(), 0);

        let results: Vec<_> = straight("ok", &[(0, 2.0), (100, 7.0), (300, 7.0), (500, 4.0)])
            .iter()
            .map(|s| det.update(s))
            .collect();
        let flags: Vec<bool> = results.iter().map(|r| r.sprint_detected).collect();
        assert_eq!(flags, vec![false, false, false, true]);
        assert_eq!(results.last().unwrap().sprint_count, 1);
    }

    #[test]
    fn test_sprint_cooldown() {
        let mut det = KinematicDetector::new();
        let profile = [
            (0, 2.0),
            (100, 7.0), (600, 3.0),
            (700, 7.0), (1200, 3.0),
        ];
        let last = straight("1", &profile).iter().map(|s| det.update(s)).last().unwrap();
        assert_eq!(last.sprint_count, 1);
        assert!(!last.sprint_detected);
    }

    #[test]
    fn test_impact_at_low_speed() {
        let mut det = KinematicDetector::new();
        det.update(&sample(0, "1", 0.0, 0.0, 0.0, 0.0));
        // 0.5 units in 100ms from standstill: |a| = 50
        let r = det.update(&sample(100, "1", 0.5, 0.0, 0.1, 0.0));
        assert!(r.impact_detected);
        assert!(!r.cod_detected, "COD requires minimum speed");
        assert_eq!(r.impact_count, 1);

        // Still violent but inside the 800ms cooldown
        let r = det.update(&sample(200, "1", 0.0, 0.0, 0.1, 0.0));
        assert!(!r.impact_detected);
        let r = det.update(&sample(1000, "1", 5.0, 0.0, 0.1, 0.0));
        assert!(r.impact_detected);
        assert_eq!(r.impact_count, 2);
    }

    #[test]
    fn test_cod_from_turn_rate() {
        let mut det = KinematicDetector::new();
        // Constant 4 units/s along the heading so |a| stays ~0
        det.update(&sample(0, "1", 0.0, 0.0, 4.0, 0.0));
        let r = det.update(&sample(1000, "1", 4.0, 0.0, 4.0, 0.0));
        assert!(!r.cod_detected);
        // heading jumps 0 → 100 in 1s while still moving along x at 4 units/s
        let r = det.update(&sample(2000, "1", 8.0, 0.0, 4.0, 100.0));
        assert!(r.cod_detected);
        assert!(!r.impact_detected);
        assert_eq!(r.cod_count, 1);
    }

    #[test]
    fn test_cod_from_acceleration_alone() {
        let mut det = KinematicDetector::new();
        det.update(&sample(0, "1", 0.0, 0.0, 4.0, 0.0));
        // Heading unchanged; 6.5 units covered in 1s against a previous 4 units/s: |a| = 2.5
        let r = det.update(&sample(1000, "1", 6.5, 0.0, 4.0, 0.0));
        assert!((r.acceleration_magnitude - 2.5).abs() < 1e-9);
        assert!(r.cod_detected, "lateral-acceleration threshold is 2.0");
        assert!(!r.impact_detected, "impact threshold is 3.0");
        assert_eq!((r.cod_count, r.impact_count), (1, 0));
    }

    #[test]
    fn test_cod_cooldown_and_min_speed() {
        let cfg = KinematicsConfig { cod_cooldown_ms: 600, ..Default::default() };
        let mut det = KinematicDetector::with_config(cfg);
        det.update(&sample(0, "1", 0.0, 0.0, 4.0, 0.0));
        let r1 = det.update(&sample(100, "1", 0.4, 0.0, 4.0, 90.0));
        assert!(r1.cod_detected);
        let r2 = det.update(&sample(200, "1", 0.8, 0.0, 4.0, 0.0));
        assert!(!r2.cod_detected, "inside cooldown");

        // Below minimum speed nothing is evaluated
        let r3 = det.update(&sample(1000, "1", 0.8, 0.0, 2.9, 180.0));
        assert!(!r3.cod_detected);
    }

    #[test]
    fn test_turn_wrap_flag() {
        let raw = KinematicsConfig::default();
        let wrapped = KinematicsConfig { normalize_turn_rate: true, ..Default::default() };

        let frames = [sample(0, "1", 0.0, 0.0, 4.0, 0.0), sample(1000, "1", 4.0, 0.0, 4.0, 359.0)];
        // Movement stays on +x so |a| is ~0; only the heading differs.
        let mut a = KinematicDetector::with_config(raw);
        let mut b = KinematicDetector::with_config(wrapped);
        let ra: Vec<_> = frames.iter().map(|f| a.update(f)).collect();
        let rb: Vec<_> = frames.iter().map(|f| b.update(f)).collect();
        assert!(ra[1].cod_detected, "raw 359°/s crosses the threshold");
        assert!(!rb[1].cod_detected, "wrapped -1°/s does not");
    }

    #[test]
    fn test_entities_are_independent() {
        let mut det = KinematicDetector::new();
        det.update(&sample(0, "a", 0.0, 0.0, 7.0, 0.0));
        let first_b = det.update(&sample(500, "b", 50.0, 50.0, 7.0, 0.0));
        assert_eq!(first_b.high_intensity_distance_step, 0.0);
        let a = det.update(&sample(500, "a", 3.5, 0.0, 7.0, 0.0));
        assert!((a.high_intensity_distance_cumulative - 3.5).abs() < 1e-9);
        assert_eq!(det.entity_count(), 2);
    }

    #[test]
    fn test_evict_restarts_entity() {
        let mut det = KinematicDetector::new();
        det.update(&sample(0, "1", 0.0, 0.0, 7.0, 0.0));
        det.update(&sample(500, "1", 3.5, 0.0, 7.0, 0.0));
        let evicted = det.evict(&EntityId::from("1")).unwrap();
        assert!((evicted.high_intensity_distance() - 3.5).abs() < 1e-9);
        assert!(det.entity_state(&EntityId::from("1")).is_none());

        let r = det.update(&sample(1000, "1", 7.0, 0.0, 7.0, 0.0));
        assert_eq!(r.high_intensity_distance_cumulative, 0.0);
    }

    #[test]
    fn test_duplicate_timestamp_stays_finite() {
        let mut det = KinematicDetector::new();
        det.update(&sample(1000, "1", 0.0, 0.0, 7.0, 0.0));
        let r = det.update(&sample(1000, "1", 0.0, 0.0, 7.0, 0.0));
        assert!(r.high_intensity_distance_step.is_finite());
        assert!(r.acceleration_magnitude.is_finite());
        assert_eq!(det.entity_state(&EntityId::from("1")).unwrap().last_timestamp(), 1000);
    }

    #[test]
    fn test_extreme_timestamp_gap_does_not_overflow() {
        let mut det = KinematicDetector::new();
        det.update(&sample(i64::MIN, "1", 0.0, 0.0, 7.0, 0.0));
        let r = det.update(&sample(i64::MAX, "1", 1.0, 0.0, 7.0, 0.0));
        assert!(r.high_intensity_distance_step.is_finite());
        assert!(r.acceleration_magnitude.is_finite());
        let r = det.update(&sample(i64::MIN, "1", 0.0, 0.0, 3.0, 0.0));
        assert!(r.high_intensity_distance_step.is_finite());
    }

    #[test]
    fn test_batch_matches_sequential() {
        let mut frames = Vec::new();
        for i in 0..40i64 {
            let speed = if (i / 5) % 2 == 0 { 7.5 } else { 2.0 };
            for (k, id) in ["a", "b", "c"].iter().enumerate() {
                let heading = ((i * 37 + k as i64 * 11) % 360) as f64;
                frames.push(sample(i * 100, id, i as f64 * 0.5, k as f64, speed, heading));
            }
        }

        let mut seq = KinematicDetector::new();
        let expected: Vec<_> = frames.iter().map(|f| seq.update(f)).collect();

        let mut par = KinematicDetector::new();
        let (head, tail) = frames.split_at(31);
        let mut got = par.update_batch(head);
        got.extend(par.update_batch(tail));

        assert_eq!(got, expected);
        assert_eq!(par.entity_count(), 3);
    }
}
