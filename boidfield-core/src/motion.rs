//! Integration with a bounded turn rate.
//!
//! Instead of adding acceleration to velocity, the heading is rotated toward
//! the accumulated force by at most `max_turn` radians per tick, and speed only
//! grows when the force points along the new heading. This gives agents a
//! finite turning radius.

use crate::{Settings, Vector2D};

/// Below this speed the heading is undefined and acceleration is applied directly.
pub const MIN_HEADING_SPEED: f64 = 0.01;

/// Fraction of the forward force component converted into speed each tick.
pub const SPEED_GAIN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionLimits {
    pub max_speed: f64,
    /// Maximum heading change per tick, radians.
    pub max_turn: f64,
}

impl MotionLimits {
    pub fn new(max_speed: f64, turn_rate_degrees: f64, assumed_fps: f64) -> Self {
        let fps = if assumed_fps > 0.0 { assumed_fps } else { 60.0 };
        Self {
            max_speed,
            max_turn: turn_rate_degrees.to_radians() / fps,
        }
    }

    pub fn boid(settings: &Settings) -> Self {
        Self::new(
            settings.max_speed,
            settings.boid_turn_rate,
            settings.assumed_fps,
        )
    }

    pub fn bad_particle(settings: &Settings) -> Self {
        Self::new(
            settings.bad_particle_max_speed,
            settings.bad_particle_turn_rate,
            settings.assumed_fps,
        )
    }
}

/// Velocity after one tick of `acceleration` under `limits`.
pub fn steer_velocity(velocity: Vector2D, acceleration: Vector2D, limits: &MotionLimits) -> Vector2D {
    let speed = velocity.magnitude();
    if speed < MIN_HEADING_SPEED {
        return (velocity + acceleration).limit(limits.max_speed);
    }

    let force = acceleration.magnitude();
    if force <= 0.0 || !force.is_finite() {
        return velocity.limit(limits.max_speed);
    }

    let heading = velocity / speed;
    let desired = acceleration / force;

    let max_turn = libm::fabs(limits.max_turn);
    let angle = heading.angle_to(&desired).clamp(-max_turn, max_turn);
    let new_heading = heading.rotate(angle);

    let projection = desired.dot(&new_heading);
    let mut new_speed = speed;
    if projection > 0.0 {
        new_speed += force * projection * SPEED_GAIN;
    }

    new_heading * new_speed.min(limits.max_speed)
}
