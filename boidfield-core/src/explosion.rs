use alloc::vec::Vec;

use crate::{Settings, SimpleRng, Vector2D};

/// Short-lived debris left behind when an adversary is destroyed
#[derive(Debug, Clone)]
pub struct ExplosionParticle {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub birth_time: f64,
    pub lifetime: f64,
}

impl ExplosionParticle {
    pub fn new(position: Vector2D, velocity: Vector2D, birth_time: f64, lifetime: f64) -> Self {
        Self {
            position,
            velocity,
            birth_time,
            lifetime,
        }
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.birth_time
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.age(now) > self.lifetime
    }

    /// Fades linearly from 1 at birth to 0 at the end of the lifetime.
    pub fn opacity(&self, now: f64) -> f64 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age(now) / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn update(&mut self) {
        self.position += self.velocity;
    }
}

/// Burst of `explosion_particle_count` particles at `origin`.
///
/// Directions and speeds are random, then every velocity is shifted by the
/// same offset so the batch's mean velocity equals `source_velocity`.
pub fn spawn_explosion(
    origin: Vector2D,
    source_velocity: Vector2D,
    now: f64,
    rng: &mut SimpleRng,
    settings: &Settings,
) -> Vec<ExplosionParticle> {
    let count = settings.explosion_particle_count;
    if count == 0 {
        return Vec::new();
    }

    let mut particles: Vec<ExplosionParticle> = (0..count)
        .map(|_| {
            let speed = rng.range_f64(settings.explosion_min_speed, settings.explosion_max_speed);
            let velocity = rng.vector_with_magnitude(speed);
            ExplosionParticle::new(origin, velocity, now, settings.explosion_lifetime)
        })
        .collect();

    let mut sum = Vector2D::zero();
    for particle in &particles {
        sum += particle.velocity;
    }
    let correction = source_velocity - sum / count as f64;
    for particle in &mut particles {
        particle.velocity += correction;
    }

    particles
}
