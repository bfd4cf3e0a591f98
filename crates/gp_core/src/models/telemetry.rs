//! Telemetry input records

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable identifier of a tracked athlete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Planar position in feed units (yards for Zebra/NFL feeds).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One positional/kinematic sample for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    /// Milliseconds; non-decreasing per entity is the caller's responsibility
    pub timestamp: i64,
    pub entity_id: EntityId,
    pub position: Position,
    /// Units/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Degrees
    #[serde(default, alias = "direction", skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl TelemetrySample {
    pub fn new(timestamp: i64, entity_id: impl Into<EntityId>, position: impl Into<Position>) -> Self {
        Self {
            timestamp,
            entity_id: entity_id.into(),
            position: position.into(),
            speed: None,
            heading: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Speed with the missing-value default applied.
    #[inline]
    pub fn speed_or_zero(&self) -> f64 {
        self.speed.unwrap_or(0.0)
    }

    /// Heading with the missing-value default applied.
    #[inline]
    pub fn heading_or_zero(&self) -> f64 {
        self.heading.unwrap_or(0.0)
    }
}
