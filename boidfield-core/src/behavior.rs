//! Steering behaviours of the flock.
//!
//! Every query is a brute-force scan over all boids, O(n) per boid and O(n²)
//! per tick. That is fine for the tens of boids a page backdrop runs.

use slotmap::SlotMap;

use crate::{Boid, BoidKey, Settings, Vector2D};

/// Where a boid's attraction force points this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitTarget {
    /// Smoothed pointer; only pulls within `attraction_radius`.
    Pointer(Vector2D),
    /// Predicted position of the nearest adversary; pulls at any range.
    Adversary(Vector2D),
}

/// An adversary as seen by the flock during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub position: Vector2D,
    pub predicted: Vector2D,
}

impl PursuitTarget {
    /// Adversary pursuit replaces pointer attraction whenever one is alive.
    pub fn select(boid: &Boid, sightings: &[Sighting], pointer: Vector2D) -> Self {
        sightings
            .iter()
            .min_by(|a, b| {
                let da = a.position.distance(&boid.position);
                let db = b.position.distance(&boid.position);
                da.total_cmp(&db)
            })
            .map(|nearest| PursuitTarget::Adversary(nearest.predicted))
            .unwrap_or(PursuitTarget::Pointer(pointer))
    }
}

/// Reynolds steering: full speed toward `desired`, minus current velocity.
pub fn steer(desired: Vector2D, velocity: Vector2D, max_speed: f64, max_force: f64) -> Vector2D {
    (desired.set_magnitude(max_speed) - velocity).limit(max_force)
}

pub fn separation<'a, I>(boid: &Boid, others: I, settings: &Settings) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = boid.position.distance(&other.position);
        if distance > 0.0 && distance < settings.separation_radius {
            sum += (boid.position - other.position) / (distance * distance);
            count += 1;
        }
    }

    if count > 0 {
        steer(
            sum / count as f64,
            boid.velocity,
            settings.max_speed,
            settings.max_force,
        )
    } else {
        Vector2D::zero()
    }
}

pub fn alignment<'a, I>(boid: &Boid, others: I, settings: &Settings) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = boid.position.distance(&other.position);
        if distance < settings.alignment_radius {
            sum += other.velocity;
            count += 1;
        }
    }

    if count > 0 {
        steer(
            sum / count as f64,
            boid.velocity,
            settings.max_speed,
            settings.max_force,
        )
    } else {
        Vector2D::zero()
    }
}

pub fn cohesion<'a, I>(boid: &Boid, others: I, settings: &Settings) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = boid.position.distance(&other.position);
        if distance < settings.cohesion_radius {
            sum += other.position;
            count += 1;
        }
    }

    if count > 0 {
        let centroid = sum / count as f64;
        steer(
            centroid - boid.position,
            boid.velocity,
            settings.max_speed,
            settings.max_force,
        )
    } else {
        Vector2D::zero()
    }
}

pub fn attraction(boid: &Boid, target: PursuitTarget, settings: &Settings) -> Vector2D {
    match target {
        PursuitTarget::Pointer(point) => {
            let desired = point - boid.position;
            let distance = desired.magnitude();
            if distance > 0.0 && distance < settings.attraction_radius {
                steer(desired, boid.velocity, settings.max_speed, settings.max_force)
            } else {
                Vector2D::zero()
            }
        }
        PursuitTarget::Adversary(predicted) => {
            let desired = predicted - boid.position;
            if desired.magnitude() > 0.0 {
                steer(
                    desired,
                    boid.velocity,
                    settings.max_speed,
                    settings.max_force * settings.bad_particle_attraction_force,
                )
            } else {
                Vector2D::zero()
            }
        }
    }
}

/// Weighted sum of all four behaviours against every boid in `flock` other
/// than `key` itself.
pub fn flock(
    key: BoidKey,
    boid: &Boid,
    flock: &SlotMap<BoidKey, Boid>,
    target: PursuitTarget,
    settings: &Settings,
) -> Vector2D {
    let others = move || {
        flock
            .iter()
            .filter(move |(other, _)| *other != key)
            .map(|(_, other)| other)
    };
    let ali = alignment(boid, others(), settings) * settings.alignment_weight;
    let coh = cohesion(boid, others(), settings) * settings.cohesion_weight;
    let sep = separation(boid, others(), settings) * settings.separation_weight;
    let att = attraction(boid, target, settings) * settings.attraction_weight;
    ali + coh + sep + att
}
