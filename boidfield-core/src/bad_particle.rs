use core::f64::consts::TAU;

use crate::motion::{self, MotionLimits};
use crate::{Boid, Settings, Vector2D};

/// An adversary the flock hunts. Flees boids and keeps off the canvas edges.
#[derive(Debug, Clone)]
pub struct BadParticle {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    /// Drives the pulsing radius when drawn.
    pub pulse_phase: f64,
}

impl BadParticle {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
            pulse_phase: 0.0,
        }
    }

    /// Inverse-square repulsion from every boid inside the escape radius,
    /// rescaled to full speed.
    pub fn flee<'a, I>(&self, boids: I, settings: &Settings) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();

        for boid in boids {
            let distance = self.position.distance(&boid.position);
            if distance > 0.0 && distance < settings.bad_particle_escape_radius {
                sum += (self.position - boid.position) / (distance * distance);
            }
        }

        sum.set_magnitude(settings.bad_particle_max_speed)
    }

    /// Cubic push away from any edge closer than `wall_repel_distance`.
    pub fn avoid_walls(&self, width: f64, height: f64, settings: &Settings) -> Vector2D {
        let margin = settings.wall_repel_distance;
        if margin <= 0.0 {
            return Vector2D::zero();
        }

        let strength = |depth: f64| {
            let force = depth / margin;
            force * force * force * settings.bad_particle_max_speed * 3.0
        };

        let mut push = Vector2D::zero();
        if self.position.x < margin {
            push.x += strength(margin - self.position.x);
        }
        if self.position.x > width - margin {
            push.x -= strength(self.position.x - (width - margin));
        }
        if self.position.y < margin {
            push.y += strength(margin - self.position.y);
        }
        if self.position.y > height - margin {
            push.y -= strength(self.position.y - (height - margin));
        }
        push
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    pub fn update<'a, I>(&mut self, boids: I, width: f64, height: f64, settings: &Settings)
    where
        I: Iterator<Item = &'a Boid>,
    {
        let flee = self.flee(boids, settings);
        let walls = self.avoid_walls(width, height, settings);
        self.apply_force(flee);
        self.apply_force(walls);

        let limits = MotionLimits::bad_particle(settings);
        self.velocity = motion::steer_velocity(self.velocity, self.acceleration, &limits);
        self.position += self.velocity;
        self.acceleration = Vector2D::zero();

        self.contain_within_bounds(width, height);
        self.pulse_phase = (self.pulse_phase + settings.pulse_speed) % TAU;
    }

    pub fn contain_within_bounds(&mut self, width: f64, height: f64) {
        self.position.x = self.position.x.max(0.0).min(width.max(0.0));
        self.position.y = self.position.y.max(0.0).min(height.max(0.0));
    }

    /// Where the particle will be after `frames` ticks at its current velocity.
    pub fn predicted_position(&self, frames: f64) -> Vector2D {
        self.position + self.velocity * frames
    }

    pub fn radius(&self, base: f64) -> f64 {
        base * (1.0 + 0.25 * libm::sin(self.pulse_phase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boid_at(x: f64, y: f64) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::zero())
    }

    #[test]
    fn test_flee_points_away_at_full_speed() {
        let settings = Settings::default();
        let particle = BadParticle::new(Vector2D::new(400.0, 300.0), Vector2D::zero());
        let boids = [boid_at(350.0, 300.0)];

        let flee = particle.flee(boids.iter(), &settings);
        assert!(flee.x > 0.0);
        assert!((flee.magnitude() - settings.bad_particle_max_speed).abs() < 1e-9);
    }

    #[test]
    fn test_flee_ignores_distant_boids() {
        let settings = Settings::default();
        let particle = BadParticle::new(Vector2D::new(400.0, 300.0), Vector2D::zero());
        let boids = [boid_at(0.0, 0.0)];
        assert_eq!(particle.flee(boids.iter(), &settings), Vector2D::zero());
    }

    #[test]
    fn test_wall_force_is_cubic() {
        let settings = Settings::default();
        let margin = settings.wall_repel_distance;

        let halfway = BadParticle::new(Vector2D::new(margin / 2.0, 300.0), Vector2D::zero());
        let push = halfway.avoid_walls(800.0, 600.0, &settings);
        let expected = 0.125 * settings.bad_particle_max_speed * 3.0;
        assert!((push.x - expected).abs() < 1e-12);
        assert_eq!(push.y, 0.0);

        let corner = BadParticle::new(Vector2D::new(800.0, 600.0), Vector2D::zero());
        let push = corner.avoid_walls(800.0, 600.0, &settings);
        assert!(push.x < 0.0 && push.y < 0.0);

        let centre = BadParticle::new(Vector2D::new(400.0, 300.0), Vector2D::zero());
        assert_eq!(centre.avoid_walls(800.0, 600.0, &settings), Vector2D::zero());
    }

    #[test]
    fn test_update_respects_speed_limit_and_bounds() {
        let settings = Settings::default();
        let mut particle = BadParticle::new(Vector2D::new(5.0, 5.0), Vector2D::new(-1.0, -1.0));
        let boids = [boid_at(10.0, 10.0), boid_at(20.0, 5.0)];

        for _ in 0..300 {
            particle.update(boids.iter(), 800.0, 600.0, &settings);
            assert!(particle.velocity.magnitude() <= settings.bad_particle_max_speed + 1e-9);
            assert!((0.0..=800.0).contains(&particle.position.x));
            assert!((0.0..=600.0).contains(&particle.position.y));
        }
    }

    #[test]
    fn test_predicted_position() {
        let particle = BadParticle::new(Vector2D::new(10.0, 10.0), Vector2D::new(2.0, -1.0));
        assert_eq!(particle.predicted_position(12.0), Vector2D::new(34.0, -2.0));
    }
}
