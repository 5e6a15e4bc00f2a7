use core::f64::consts::TAU;

use crate::Vector2D;

/// Small seedable pseudo-random generator (LCG, Numerical Recipes constants).
/// Decoration-grade randomness; identical sequences on native and wasm.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Generate next u32 value
    pub fn next_u32(&mut self) -> u32 {
        const A: u32 = 1664525;
        const C: u32 = 1013904223;

        self.state = self.state.wrapping_mul(A).wrapping_add(C);
        self.state
    }

    /// Generate a float in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Generate a float in range [min, max)
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniformly distributed direction of the given length.
    pub fn vector_with_magnitude(&mut self, magnitude: f64) -> Vector2D {
        Vector2D::from_angle(self.next_f64() * TAU) * magnitude
    }
}
