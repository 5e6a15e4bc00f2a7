use crate::Vector2D;

/// Exponentially smoothed point that trails the pointer, or an adversary
/// while one is alive. The cursor decoration layer draws at this point and
/// the flock is attracted to it.
#[derive(Debug, Clone)]
pub struct Tracker {
    pointer: Vector2D,
    smoothed: Vector2D,
    alpha: f64,
}

impl Tracker {
    pub fn new(start: Vector2D, alpha: f64) -> Self {
        Self {
            pointer: start,
            smoothed: start,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn pointer(&self) -> Vector2D {
        self.pointer
    }

    pub fn set_pointer(&mut self, position: Vector2D) {
        self.pointer = position;
    }

    pub fn point(&self) -> Vector2D {
        self.smoothed
    }

    /// `smoothed = alpha * target + (1 - alpha) * smoothed`
    pub fn follow(&mut self, target: Vector2D) -> Vector2D {
        self.smoothed = target * self.alpha + self.smoothed * (1.0 - self.alpha);
        self.smoothed
    }
}
