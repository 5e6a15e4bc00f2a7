use std::collections::HashMap;

use boidfield_core::{
    BadParticle, Boid, BoidKey, DrawCommand, NullTarget, Settings, SignalState, Simulation,
    SimpleRng, Vector2D,
};

const FRAME: f64 = 1000.0 / 60.0;

fn centroid(sim: &Simulation) -> Vector2D {
    let mut sum = Vector2D::zero();
    for (_, boid) in sim.boids() {
        sum += boid.position;
    }
    sum / sim.boid_count() as f64
}

/// Boids scattered in a disc around `centre`, initially at rest.
fn clustered(sim: &mut Simulation, count: usize, centre: Vector2D, radius: f64, seed: u32) {
    let mut rng = SimpleRng::new(seed);
    for _ in 0..count {
        let distance = rng.range_f64(0.0, radius);
        let offset = rng.vector_with_magnitude(distance);
        let velocity = rng.vector_with_magnitude(1.0);
        sim.add_boid(Boid::new(centre + offset, velocity));
    }
}

#[test]
fn test_flock_drifts_toward_resting_pointer() {
    let settings = Settings {
        attraction_radius: 2000.0,
        ..Settings::default()
    };
    let mut sim = Simulation::empty(3000.0, 3000.0, settings, 17);
    let pointer = Vector2D::new(1500.0, 1500.0);
    clustered(&mut sim, 85, Vector2D::new(1250.0, 1500.0), 60.0, 17);
    sim.pointer_moved(pointer.x, pointer.y);

    let initial = centroid(&sim).distance(&pointer);
    let mut now = 0.0;
    let mut total = 0.0;
    let mut samples = 0;
    for tick in 0..450 {
        sim.tick(now, &mut NullTarget);
        now += FRAME;
        if tick >= 150 {
            total += centroid(&sim).distance(&pointer);
            samples += 1;
        }
    }

    assert_eq!(sim.boid_count(), 85);
    let average = total / samples as f64;
    assert!(
        average < initial,
        "average centroid distance {average} should be below {initial}"
    );
}

#[test]
fn test_adversary_triggers_signal_that_expires_on_time() {
    let settings = Settings::default();
    let duration = settings.signal_duration;
    let cooldown = settings.signal_cooldown;
    let mut sim = Simulation::empty(800.0, 600.0, settings, 3);
    clustered(&mut sim, 12, Vector2D::new(300.0, 300.0), 40.0, 3);

    sim.spawn_adversary(300.0, 370.0).expect("cap allows one adversary");

    let mut now = 0.0;
    let mut first_signal: Option<(BoidKey, f64)> = None;
    for _ in 0..120 {
        sim.tick(now, &mut NullTarget);
        first_signal = sim
            .boids()
            .find_map(|(handle, boid)| boid.last_signal_time.map(|start| (handle, start)));
        if first_signal.is_some() {
            break;
        }
        now += FRAME;
    }

    let (handle, started) = first_signal.expect("a boid detects the adversary");
    assert_eq!(started, now);
    let boid = sim.boid(handle).expect("signalling boid survives its detection tick");
    assert_eq!(boid.signal_state(started, cooldown), SignalState::Signaling);
    assert_eq!(
        boid.signal_state(started + duration - 1e-6, cooldown),
        SignalState::Signaling
    );
    assert_eq!(
        boid.signal_state(started + duration, cooldown),
        SignalState::Cooldown
    );
}

#[test]
fn test_forced_collision_spawns_conserving_explosion() {
    let settings = Settings::default();
    let count = settings.explosion_particle_count;
    let lifetime = settings.explosion_lifetime;
    let mut sim = Simulation::empty(800.0, 600.0, settings, 9);

    let victim = sim.add_boid(Boid::new(Vector2D::new(400.0, 300.0), Vector2D::zero()));
    sim.add_boid(Boid::new(Vector2D::new(50.0, 50.0), Vector2D::zero()));
    sim.add_boid(Boid::new(Vector2D::new(750.0, 50.0), Vector2D::zero()));
    sim.add_boid(Boid::new(Vector2D::new(50.0, 550.0), Vector2D::zero()));

    let adversary_velocity = Vector2D::new(1.5, -0.5);
    let adversary = sim
        .insert_adversary(BadParticle::new(Vector2D::new(402.0, 300.0), adversary_velocity))
        .unwrap();

    let summary = sim.tick(0.0, &mut NullTarget);
    assert_eq!(summary.collisions, 1);
    assert!(sim.boid(victim).is_none());
    assert!(sim.bad_particle(adversary).is_none());
    assert!(!sim.adversary_alive());
    assert_eq!(sim.explosions().len(), count);

    let mut mean = Vector2D::zero();
    for particle in sim.explosions() {
        mean += particle.velocity;
    }
    mean = mean / count as f64;
    assert!((mean.x - adversary_velocity.x).abs() < 1e-9);
    assert!((mean.y - adversary_velocity.y).abs() < 1e-9);

    let mut now = 0.0;
    while now <= lifetime {
        now += FRAME;
        let summary = sim.tick(now, &mut NullTarget);
        if now <= lifetime {
            assert_eq!(summary.explosion_count, count, "alive at {now}");
        }
    }
    assert!(sim.explosions().is_empty());
}

#[test]
fn test_spawn_accepted_again_after_collision_frees_the_cap() {
    let mut sim = Simulation::empty(800.0, 600.0, Settings::default(), 21);
    sim.add_boid(Boid::new(Vector2D::new(400.0, 300.0), Vector2D::zero()));
    for &(x, y) in &[
        (50.0, 50.0),
        (200.0, 50.0),
        (350.0, 50.0),
        (500.0, 50.0),
        (650.0, 50.0),
        (50.0, 550.0),
        (200.0, 550.0),
        (350.0, 550.0),
    ] {
        sim.add_boid(Boid::new(Vector2D::new(x, y), Vector2D::zero()));
    }
    assert_eq!(sim.adversary_cap(), 2);

    sim.insert_adversary(BadParticle::new(Vector2D::new(402.0, 300.0), Vector2D::zero()))
        .unwrap();
    sim.insert_adversary(BadParticle::new(Vector2D::new(700.0, 450.0), Vector2D::zero()))
        .unwrap();
    assert!(sim.spawn_adversary(600.0, 300.0).is_err());

    let summary = sim.tick(0.0, &mut NullTarget);
    assert_eq!(summary.collisions, 1);
    assert_eq!(sim.boid_count(), 8);
    assert_eq!(sim.adversary_count(), 1);

    assert!(sim.spawn_adversary(600.0, 300.0).is_ok());
    assert_eq!(sim.adversary_count(), 2);
}

#[test]
fn test_long_run_invariants() {
    let settings = Settings::default();
    let max_speed = settings.max_speed;
    let bad_max_speed = settings.bad_particle_max_speed;
    let cooldown = settings.signal_cooldown;
    let mut sim = Simulation::with_seed(900.0, 700.0, settings, 77);

    let mut last_starts: HashMap<BoidKey, f64> = HashMap::new();
    let mut accepted = 0;
    let mut now = 0.0;
    for tick in 0..900 {
        if tick % 120 == 0 && sim.spawn_adversary(450.0, 350.0).is_ok() {
            accepted += 1;
        }
        if tick == 300 {
            let position = sim
                .boids()
                .map(|(_, boid)| boid.position)
                .find(|p| p.x > 20.0 && p.x < 880.0 && p.y > 20.0 && p.y < 680.0)
                .unwrap();
            sim.insert_adversary(BadParticle::new(position + Vector2D::new(1.0, 0.0), Vector2D::zero()))
                .unwrap();
        }
        if tick == 301 {
            assert!(sim.spawn_adversary(450.0, 350.0).is_ok());
            accepted += 1;
        }
        sim.pointer_moved(300.0 + (tick % 200) as f64, 350.0);
        let summary = sim.tick(now, &mut NullTarget);
        if tick == 300 {
            assert!(summary.collisions >= 1);
        }

        for (key, boid) in sim.boids() {
            assert!(boid.velocity.magnitude() <= max_speed + 1e-9);
            if let Some(start) = boid.last_signal_time {
                if let Some(previous) = last_starts.insert(key, start) {
                    if previous != start {
                        assert!(
                            start - previous >= cooldown,
                            "boid restarted after {}",
                            start - previous
                        );
                    }
                }
            }
        }
        for (_, particle) in sim.bad_particles() {
            assert!(particle.velocity.magnitude() <= bad_max_speed + 1e-9);
        }
        assert!(sim.adversary_count() <= sim.adversary_cap());
        now += FRAME;
    }
    assert!(accepted >= 2);
}

#[test]
fn test_shrink_resize_self_corrects_within_one_tick() {
    let mut sim = Simulation::with_seed(900.0, 700.0, Settings::default(), 31);
    sim.spawn_adversary(880.0, 680.0).unwrap();

    sim.resize(300.0, 200.0);
    sim.tick(0.0, &mut NullTarget);

    let inside = |p: Vector2D| p.x >= 0.0 && p.x <= 300.0 && p.y >= 0.0 && p.y <= 200.0;
    for (_, boid) in sim.boids() {
        assert!(inside(boid.position), "boid at {:?}", boid.position);
    }
    for (_, particle) in sim.bad_particles() {
        assert!(inside(particle.position), "adversary at {:?}", particle.position);
    }
}

#[test]
fn test_neighbor_links_brighten_while_signalling() {
    let mut sim = Simulation::empty(800.0, 600.0, Settings::default(), 5);
    for &(x, y) in &[(100.0, 100.0), (120.0, 100.0), (100.0, 130.0), (140.0, 140.0)] {
        sim.add_boid(Boid::new(Vector2D::new(x, y), Vector2D::zero()));
    }
    sim.insert_adversary(BadParticle::new(Vector2D::new(160.0, 100.0), Vector2D::zero()))
        .unwrap();

    let mut commands = Vec::new();
    sim.tick(0.0, &mut commands);

    let bright_links = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Line { alpha, .. } if *alpha > 0.5))
        .count();
    assert_eq!(bright_links, 4 * 3);
}
