use crate::motion::{self, MotionLimits};
use crate::{SimpleRng, Vector2D};

/// Alert state of a boid at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    Idle,
    Signaling,
    Cooldown,
}

/// A single boid entity
#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    /// End of the current or last signal, ms.
    pub signal_end_time: Option<f64>,
    /// Start of the last signal, ms.
    pub last_signal_time: Option<f64>,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
            signal_end_time: None,
            last_signal_time: None,
        }
    }

    pub fn random(rng: &mut SimpleRng, width: f64, height: f64, max_speed: f64) -> Self {
        let position = Vector2D::new(rng.range_f64(0.0, width), rng.range_f64(0.0, height));
        let velocity = Vector2D::new(
            (rng.next_f64() - 0.5) * max_speed,
            (rng.next_f64() - 0.5) * max_speed,
        );
        Self::new(position, velocity)
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    pub fn update(&mut self, limits: &MotionLimits) {
        self.velocity = motion::steer_velocity(self.velocity, self.acceleration, limits);
        self.position += self.velocity;
        self.acceleration = Vector2D::zero();
    }

    pub fn wrap_edges(&mut self, width: f64, height: f64) {
        if self.position.x < 0.0 {
            self.position.x = width;
        } else if self.position.x > width {
            self.position.x = 0.0;
        }

        if self.position.y < 0.0 {
            self.position.y = height;
        } else if self.position.y > height {
            self.position.y = 0.0;
        }
    }

    pub fn signal_state(&self, now: f64, cooldown: f64) -> SignalState {
        if self.is_signaling(now) {
            return SignalState::Signaling;
        }
        match self.last_signal_time {
            Some(started) if now - started < cooldown => SignalState::Cooldown,
            _ => SignalState::Idle,
        }
    }

    pub fn is_signaling(&self, now: f64) -> bool {
        self.signal_end_time.is_some_and(|end| now < end)
    }

    /// A boid that never signalled can always start.
    pub fn can_signal(&self, now: f64, cooldown: f64) -> bool {
        match self.last_signal_time {
            Some(started) => now - started >= cooldown,
            None => true,
        }
    }

    pub fn start_signal(&mut self, now: f64, duration: f64) {
        self.last_signal_time = Some(now);
        self.signal_end_time = Some(now + duration);
    }
}
