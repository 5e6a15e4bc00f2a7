use alloc::vec::Vec;

use slotmap::SlotMap;

use crate::behavior::{self, PursuitTarget, Sighting};
use crate::explosion::{self, ExplosionParticle};
use crate::gesture::LongPress;
use crate::motion::MotionLimits;
use crate::neighbors::{self, NeighborList, MAX_NEIGHBORS};
use crate::render::{palette, DrawCommand, RenderTarget};
use crate::signal::SignalQueue;
use crate::tracking::Tracker;
use crate::{
    AdversaryKey, BadParticle, Boid, BoidKey, Settings, SimpleRng, StatusReport, Vector2D,
};

/// Why an adversary spawn was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    /// `floor(boids / 4)` adversaries are already alive.
    #[error("adversary cap reached ({alive} alive, cap {cap})")]
    CapReached { alive: usize, cap: usize },
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub collisions: usize,
    pub signals_started: usize,
    pub adversaries_spawned: usize,
    pub boid_count: usize,
    pub adversary_count: usize,
    pub explosion_count: usize,
}

/// Owns every entity collection and drives the per-frame update.
pub struct Simulation {
    pub settings: Settings,
    boids: SlotMap<BoidKey, Boid>,
    bad_particles: SlotMap<AdversaryKey, BadParticle>,
    explosions: Vec<ExplosionParticle>,
    signal_queue: SignalQueue,
    tracker: Tracker,
    long_press: LongPress,
    rng: SimpleRng,
    width: f64,
    height: f64,
    tick_count: u64,
}

impl Simulation {
    /// Flock of `settings.num_boids` randomly placed boids.
    pub fn with_seed(width: f64, height: f64, settings: Settings, seed: u32) -> Self {
        let mut sim = Self::empty(width, height, settings, seed);
        for _ in 0..sim.settings.num_boids {
            let boid = Boid::random(&mut sim.rng, width, height, sim.settings.max_speed);
            sim.boids.insert(boid);
        }
        log::info!(
            "Simulation started with {} boids on {}x{}",
            sim.boids.len(),
            width,
            height
        );
        sim
    }

    #[cfg(feature = "std")]
    pub fn new(width: f64, height: f64, settings: Settings) -> Self {
        Self::with_seed(width, height, settings, rand::random())
    }

    /// No entities; callers populate it with [`Simulation::add_boid`].
    pub fn empty(width: f64, height: f64, mut settings: Settings, seed: u32) -> Self {
        if settings.neighbor_count > MAX_NEIGHBORS {
            log::warn!(
                "neighbor_count {} exceeds the supported {}, clamping",
                settings.neighbor_count,
                MAX_NEIGHBORS
            );
            settings.neighbor_count = MAX_NEIGHBORS;
        }

        let centre = Vector2D::new(width / 2.0, height / 2.0);
        Self {
            boids: SlotMap::with_capacity_and_key(settings.num_boids),
            bad_particles: SlotMap::with_key(),
            explosions: Vec::new(),
            signal_queue: SignalQueue::new(),
            tracker: Tracker::new(centre, settings.tracking_alpha),
            long_press: LongPress::new(settings.long_press_ms, settings.long_press_slop),
            rng: SimpleRng::new(seed),
            width,
            height,
            tick_count: 0,
            settings,
        }
    }

    pub fn add_boid(&mut self, boid: Boid) -> BoidKey {
        self.boids.insert(boid)
    }

    pub fn boid(&self, key: BoidKey) -> Option<&Boid> {
        self.boids.get(key)
    }

    pub fn boids(&self) -> impl Iterator<Item = (BoidKey, &Boid)> + '_ {
        self.boids.iter()
    }

    pub fn boid_count(&self) -> usize {
        self.boids.len()
    }

    pub fn bad_particle(&self, key: AdversaryKey) -> Option<&BadParticle> {
        self.bad_particles.get(key)
    }

    pub fn bad_particles(&self) -> impl Iterator<Item = (AdversaryKey, &BadParticle)> + '_ {
        self.bad_particles.iter()
    }

    pub fn adversary_count(&self) -> usize {
        self.bad_particles.len()
    }

    pub fn adversary_alive(&self) -> bool {
        !self.bad_particles.is_empty()
    }

    pub fn adversary_cap(&self) -> usize {
        self.boids.len() / 4
    }

    pub fn explosions(&self) -> &[ExplosionParticle] {
        &self.explosions
    }

    pub fn pending_signals(&self) -> usize {
        self.signal_queue.len()
    }

    pub fn signaling_count(&self, now: f64) -> usize {
        self.boids.values().filter(|b| b.is_signaling(now)).count()
    }

    pub fn tracking_point(&self) -> Vector2D {
        self.tracker.point()
    }

    pub fn long_press(&self) -> &LongPress {
        &self.long_press
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        log::info!("Resized to {}x{}", width, height);
    }

    /// Spawn an adversary at `(x, y)` with a random heading at half speed.
    pub fn spawn_adversary(&mut self, x: f64, y: f64) -> Result<AdversaryKey, SpawnError> {
        let velocity = self
            .rng
            .vector_with_magnitude(self.settings.bad_particle_max_speed * 0.5);
        self.insert_adversary(BadParticle::new(Vector2D::new(x, y), velocity))
    }

    pub fn insert_adversary(&mut self, particle: BadParticle) -> Result<AdversaryKey, SpawnError> {
        let alive = self.bad_particles.len();
        let cap = self.adversary_cap();
        if alive >= cap {
            return Err(SpawnError::CapReached { alive, cap });
        }

        log::debug!(
            "Spawning adversary at ({:.1}, {:.1})",
            particle.position.x,
            particle.position.y
        );
        Ok(self.bad_particles.insert(particle))
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let position = Vector2D::new(x, y);
        self.tracker.set_pointer(position);
        self.long_press.moved(position);
    }

    /// Arms a long press; it spawns an adversary if held long enough.
    pub fn pointer_pressed(&mut self, x: f64, y: f64, now: f64) {
        let position = Vector2D::new(x, y);
        self.tracker.set_pointer(position);
        self.long_press.press(position, now);
    }

    pub fn pointer_released(&mut self) {
        self.long_press.release();
    }

    pub fn secondary_click(&mut self, x: f64, y: f64) -> Result<AdversaryKey, SpawnError> {
        self.spawn_adversary(x, y)
    }

    /// The `neighbor_count` boids nearest to `key`.
    pub fn nearest_neighbors(&self, key: BoidKey) -> NeighborList {
        neighbors::nearest(&self.boids, key, self.settings.neighbor_count)
    }

    pub fn status(&self, now: f64) -> StatusReport {
        StatusReport {
            tick: self.tick_count,
            boid_count: self.boids.len(),
            adversary_count: self.bad_particles.len(),
            explosion_count: self.explosions.len(),
            signaling_count: self.signaling_count(now),
            adversary_alive: self.adversary_alive(),
            tracking_point: self.tracker.point().into(),
        }
    }

    /// Advance one frame at monotonic time `now` (ms) and draw it.
    pub fn tick<R: RenderTarget + ?Sized>(&mut self, now: f64, target: &mut R) -> TickSummary {
        self.tick_count += 1;
        let mut summary = TickSummary::default();

        target.draw(DrawCommand::Fade {
            color: palette::BACKGROUND,
            alpha: self.settings.trail_fade_alpha,
        });

        if let Some(origin) = self.long_press.poll(now) {
            match self.spawn_adversary(origin.x, origin.y) {
                Ok(_) => summary.adversaries_spawned += 1,
                Err(err) => log::debug!("Long press ignored: {}", err),
            }
        }

        self.update_tracking_point();
        summary.signals_started += self.process_signal_queue(now);
        summary.signals_started += self.detect_adversaries(now);
        self.draw_neighbor_graph(now, target);

        self.update_boids();
        summary.collisions = self.resolve_collisions(now);
        self.draw_boids(target);

        self.update_bad_particles(target);
        self.update_explosions(now, target);

        summary.boid_count = self.boids.len();
        summary.adversary_count = self.bad_particles.len();
        summary.explosion_count = self.explosions.len();
        log::trace!("tick {}: {:?}", self.tick_count, summary);
        summary
    }

    fn sightings(&self) -> Vec<Sighting> {
        self.bad_particles
            .values()
            .map(|p| Sighting {
                position: p.position,
                predicted: p.predicted_position(self.settings.look_ahead_frames),
            })
            .collect()
    }

    fn update_tracking_point(&mut self) {
        let smoothed = self.tracker.point();
        let target = self
            .sightings()
            .into_iter()
            .min_by(|a, b| {
                a.position
                    .distance(&smoothed)
                    .total_cmp(&b.position.distance(&smoothed))
            })
            .map(|nearest| nearest.predicted)
            .unwrap_or_else(|| self.tracker.pointer());
        self.tracker.follow(target);
    }

    /// Starts a signal on `key` unless it is gone or cooling down.
    fn start_signal(&mut self, key: BoidKey, now: f64) -> bool {
        let Some(boid) = self.boids.get_mut(key) else {
            return false;
        };
        if !boid.can_signal(now, self.settings.signal_cooldown) {
            return false;
        }

        boid.start_signal(now, self.settings.signal_duration);
        self.signal_queue
            .schedule(key, now + self.settings.signal_propagation_delay);
        true
    }

    fn process_signal_queue(&mut self, now: f64) -> usize {
        let mut started = 0;

        for event in self.signal_queue.take_due(now) {
            if !self.boids.contains_key(event.boid) {
                log::debug!("Dropping signal for removed boid {:?}", event.boid);
                continue;
            }

            for neighbor in self.nearest_neighbors(event.boid) {
                if self.start_signal(neighbor, now) {
                    started += 1;
                }
            }
        }

        started
    }

    fn detect_adversaries(&mut self, now: f64) -> usize {
        if self.bad_particles.is_empty() {
            return 0;
        }

        let radius = self.settings.bad_particle_detection_radius;
        let alerted: Vec<BoidKey> = self
            .boids
            .iter()
            .filter(|(_, boid)| {
                self.bad_particles
                    .values()
                    .any(|p| p.position.distance(&boid.position) < radius)
            })
            .map(|(key, _)| key)
            .collect();

        alerted
            .into_iter()
            .filter(|&key| self.start_signal(key, now))
            .count()
    }

    fn draw_neighbor_graph<R: RenderTarget + ?Sized>(&self, now: f64, target: &mut R) {
        for (key, boid) in self.boids.iter() {
            let signaling = boid.is_signaling(now);
            let (color, alpha, glow) = if signaling {
                (palette::LINK_SIGNAL, 0.9, 12.0)
            } else {
                (palette::LINK, 0.2, 8.0)
            };

            for neighbor in self.nearest_neighbors(key) {
                if let Some(other) = self.boids.get(neighbor) {
                    target.draw(DrawCommand::Line {
                        from: boid.position,
                        to: other.position,
                        color,
                        width: 1.0,
                        glow,
                        alpha,
                    });
                }
            }
        }
    }

    /// Boids move one at a time in slot order, so each one steers against
    /// the already moved positions of the boids before it.
    fn update_boids(&mut self) {
        let sightings = self.sightings();
        let pointer = self.tracker.point();
        let limits = MotionLimits::boid(&self.settings);
        let keys: Vec<BoidKey> = self.boids.keys().collect();

        for key in keys {
            let Some(boid) = self.boids.get(key) else {
                continue;
            };
            let target = PursuitTarget::select(boid, &sightings, pointer);
            let force = behavior::flock(key, boid, &self.boids, target, &self.settings);

            if let Some(boid) = self.boids.get_mut(key) {
                boid.apply_force(force);
                boid.update(&limits);
                boid.wrap_edges(self.width, self.height);
            }
        }
    }

    /// Each adversary destroys at most the first boid (slot order) inside the
    /// destruction radius, and dies with it.
    fn resolve_collisions(&mut self, now: f64) -> usize {
        let radius = self.settings.mutual_destruction_radius;
        let mut collisions = 0;

        let adversaries: Vec<AdversaryKey> = self.bad_particles.keys().collect();
        for adversary in adversaries {
            let Some(particle) = self.bad_particles.get(adversary) else {
                continue;
            };
            let hit = self
                .boids
                .iter()
                .find(|(_, boid)| boid.position.distance(&particle.position) < radius)
                .map(|(key, _)| key);

            let Some(victim) = hit else {
                continue;
            };
            self.boids.remove(victim);
            if let Some(dead) = self.bad_particles.remove(adversary) {
                log::debug!(
                    "Adversary destroyed at ({:.1}, {:.1}), {} boids left",
                    dead.position.x,
                    dead.position.y,
                    self.boids.len()
                );
                let debris = explosion::spawn_explosion(
                    dead.position,
                    dead.velocity,
                    now,
                    &mut self.rng,
                    &self.settings,
                );
                self.explosions.extend(debris);
                collisions += 1;
            }
        }

        collisions
    }

    fn draw_boids<R: RenderTarget + ?Sized>(&self, target: &mut R) {
        for boid in self.boids.values() {
            target.draw(DrawCommand::Circle {
                center: boid.position,
                radius: self.settings.boid_size,
                color: palette::BOID,
                glow: 2.0,
                alpha: 1.0,
            });
        }
    }

    fn update_bad_particles<R: RenderTarget + ?Sized>(&mut self, target: &mut R) {
        for particle in self.bad_particles.values_mut() {
            particle.update(self.boids.values(), self.width, self.height, &self.settings);
            target.draw(DrawCommand::Circle {
                center: particle.position,
                radius: particle.radius(self.settings.bad_particle_size),
                color: palette::BAD_PARTICLE,
                glow: 15.0,
                alpha: 1.0,
            });
        }
    }

    fn update_explosions<R: RenderTarget + ?Sized>(&mut self, now: f64, target: &mut R) {
        self.explosions.retain(|p| !p.is_expired(now));

        for particle in &mut self.explosions {
            particle.update();
            target.draw(DrawCommand::Circle {
                center: particle.position,
                radius: self.settings.explosion_particle_size,
                color: palette::EXPLOSION,
                glow: 6.0,
                alpha: particle.opacity(now),
            });
        }
    }
}
