#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bad_particle;
pub mod behavior;
pub mod boid;
pub mod explosion;
pub mod gesture;
pub mod motion;
pub mod neighbors;
pub mod render;
pub mod rng;
pub mod signal;
pub mod simulation;
pub mod tracking;

pub use bad_particle::BadParticle;
pub use behavior::PursuitTarget;
pub use boid::{Boid, SignalState};
pub use boidfield_shared::{Position, Settings, StatusReport};
pub use explosion::ExplosionParticle;
pub use gesture::{LongPress, PressState};
pub use motion::MotionLimits;
pub use render::{Color, DrawCommand, NullTarget, RenderTarget};
pub use rng::SimpleRng;
pub use simulation::{Simulation, SpawnError, TickSummary};
pub use tracking::Tracker;

slotmap::new_key_type! {
    /// Generation-tagged reference to a boid. Stops resolving once the boid
    /// is removed, even after its slot is reused.
    pub struct BoidKey;
    pub struct AdversaryKey;
}

/// A 2D vector used for position, velocity and steering forces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing at `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: libm::cos(angle),
            y: libm::sin(angle),
        }
    }

    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y)
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Rescale to `mag`. A zero vector stays zero.
    pub fn set_magnitude(&self, mag: f64) -> Self {
        self.normalize() * mag
    }

    pub fn limit(&self, max: f64) -> Self {
        let mag = self.magnitude();
        if mag > max {
            let normalized = self.normalize();
            Self {
                x: normalized.x * max,
                y: normalized.y * max,
            }
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrt(dx * dx + dy * dy)
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(&self, other: &Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn rotate(&self, angle: f64) -> Self {
        let (sin, cos) = (libm::sin(angle), libm::cos(angle));
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Signed angle from `self` to `other` in `(-PI, PI]`.
    pub fn angle_to(&self, other: &Vector2D) -> f64 {
        libm::atan2(self.cross(other), self.dot(other))
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Position::new(v.x, v.y)
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}
