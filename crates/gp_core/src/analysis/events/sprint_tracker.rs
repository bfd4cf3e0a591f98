//! # Sprint Tracker
//!
//! Streaming hysteresis state machine for sprint confirmation.
//!
//! ## Algorithm
//! 1. `Idle → InSprint` when speed >= enter speed (entry timestamp recorded)
//! 2. `InSprint → Idle` when speed < enter speed × exit fraction
//! 3. On exit the episode is confirmed when its duration >= minimum duration
//!    and the sprint cooldown (measured between confirmations) has elapsed
//! 4. Speeds between the two thresholds never cause a transition

use super::cooldown::EventGate;
use crate::config::KinematicsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SprintPhase {
    #[default]
    Idle,
    InSprint { entered_ms: i64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SprintTracker {
    phase: SprintPhase,
    gate: EventGate,
}

impl SprintTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance with one tick. Returns true on the tick a sprint is confirmed.
    pub fn step(&mut self, timestamp: i64, speed: f64, cfg: &KinematicsConfig) -> bool {
        match self.phase {
            SprintPhase::Idle => {
                if speed >= cfg.sprint_enter_speed {
                    self.phase = SprintPhase::InSprint { entered_ms: timestamp };
                }
                false
            }
            SprintPhase::InSprint { entered_ms } => {
                if speed >= cfg.sprint_exit_speed() {
                    return false;
                }
                self.phase = SprintPhase::Idle;
                let duration_ms = timestamp.saturating_sub(entered_ms);
                duration_ms >= cfg.sprint_min_duration_ms
                    && self.gate.try_fire(timestamp, cfg.sprint_cooldown_ms)
            }
        }
    }

    pub fn phase(&self) -> SprintPhase {
        self.phase
    }

    pub fn in_sprint(&self) -> bool {
        matches!(self.phase, SprintPhase::InSprint { .. })
    }

    pub fn entered_ms(&self) -> Option<i64> {
        match self.phase {
            SprintPhase::InSprint { entered_ms } => Some(entered_ms),
            SprintPhase::Idle => None,
        }
    }

    pub fn count(&self) -> u32 {
        self.gate.count()
    }

    pub fn last_event_ms(&self) -> Option<i64> {
        self.gate.last_event_ms()
    }
}
