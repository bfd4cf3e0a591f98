//! # Tick Kinematics
//!
//! Incremental numeric differentiation between two consecutive samples of
//! one entity.
//!
//! ## Algorithm
//! 1. dt = (t1 - t0) / 1000, floored to [`MIN_DT_S`]
//! 2. Current velocity from positional displacement over dt
//! 3. Previous velocity from the previous speed + heading (polar → cartesian)
//! 4. Acceleration = Δvelocity / dt
//! 5. Turn rate = Δheading / dt (raw difference unless wrapping is requested)

use nalgebra::Vector2;

use crate::models::Position;

/// Floor for dt in seconds; keeps duplicate or reordered timestamps finite.
pub const MIN_DT_S: f64 = 1e-6;

/// Previous sample as remembered by the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionAnchor {
    pub timestamp: i64,
    pub position: Position,
    pub speed: f64,
    pub heading: f64,
}

/// Derived kinematics for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionDelta {
    /// Seconds, always >= MIN_DT_S
    pub dt_s: f64,
    /// Raw dt was zero or negative and got clamped
    pub clamped: bool,
    pub velocity: Vector2<f64>,
    pub previous_velocity: Vector2<f64>,
    pub acceleration: Vector2<f64>,
    /// °/s
    pub turn_rate: f64,
}

impl MotionDelta {
    pub fn between(
        prev: &MotionAnchor,
        timestamp: i64,
        position: Position,
        heading: f64,
        wrap_heading: bool,
    ) -> Self {
        let raw_dt = timestamp.saturating_sub(prev.timestamp) as f64 / 1000.0;
        let dt_s = raw_dt.max(MIN_DT_S);

        let velocity = Vector2::new(
            (position.x - prev.position.x) / dt_s,
            (position.y - prev.position.y) / dt_s,
        );
        let previous_velocity = polar_to_cartesian(prev.speed, prev.heading);
        let acceleration = (velocity - previous_velocity) / dt_s;

        let dh = if wrap_heading {
            wrap_degrees(heading - prev.heading)
        } else {
            heading - prev.heading
        };

        Self {
            dt_s,
            clamped: raw_dt < MIN_DT_S,
            velocity,
            previous_velocity,
            acceleration,
            turn_rate: dh / dt_s,
        }
    }

    #[inline]
    pub fn acceleration_magnitude(&self) -> f64 {
        self.acceleration.norm()
    }
}

/// Speed + heading (degrees) → velocity vector.
#[inline]
pub fn polar_to_cartesian(speed: f64, heading_deg: f64) -> Vector2<f64> {
    let rad = heading_deg.to_radians();
    Vector2::new(speed * rad.cos(), speed * rad.sin())
}

/// Wrap an angle difference into (-180, 180].
pub fn wrap_degrees(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
