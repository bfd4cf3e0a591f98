//! Cooldown-gated event counter shared by sprint, COD and impact detection.

/// Counts confirmed events and enforces a minimum gap between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventGate {
    last_event_ms: Option<i64>,
    count: u32,
}

impl EventGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no event has fired yet or strictly more than `cooldown_ms`
    /// has elapsed since the last one.
    #[inline]
    pub fn is_open(&self, timestamp: i64, cooldown_ms: i64) -> bool {
        match self.last_event_ms {
            None => true,
            Some(last) => timestamp.saturating_sub(last) > cooldown_ms,
        }
    }

    /// Confirm an event at `timestamp` if the gate is open.
    pub fn try_fire(&mut self, timestamp: i64, cooldown_ms: i64) -> bool {
        if !self.is_open(timestamp, cooldown_ms) {
            return false;
        }
        self.count = self.count.saturating_add(1);
        self.last_event_ms = Some(timestamp);
        true
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_event_ms(&self) -> Option<i64> {
        self.last_event_ms
    }
}
