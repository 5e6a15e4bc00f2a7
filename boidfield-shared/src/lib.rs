#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

/// Represents a 2D position in canvas coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrt(dx * dx + dy * dy)
    }
}

/// Tuning constants for the backdrop simulation.
///
/// Distances are in canvas pixels, speeds in pixels per tick, times in
/// milliseconds and turn rates in degrees per second. Missing fields in a
/// config file fall back to [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub num_boids: usize,
    pub boid_size: f64,
    pub max_speed: f64,
    pub max_force: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    pub attraction_weight: f64,
    pub separation_radius: f64,
    pub alignment_radius: f64,
    pub cohesion_radius: f64,
    pub attraction_radius: f64,
    /// Maximum heading change of a boid, degrees per second.
    pub boid_turn_rate: f64,
    /// Frame rate the turn rates are converted against.
    pub assumed_fps: f64,
    /// Neighbours alerted by a propagated signal and linked in the graph.
    /// The simulation supports at most 8.
    pub neighbor_count: usize,

    pub bad_particle_size: f64,
    pub bad_particle_max_speed: f64,
    pub bad_particle_turn_rate: f64,
    pub bad_particle_escape_radius: f64,
    pub bad_particle_detection_radius: f64,
    /// Multiplier on `max_force` while boids chase an adversary.
    pub bad_particle_attraction_force: f64,
    /// Frames of look-ahead for predicted adversary positions.
    pub look_ahead_frames: f64,
    pub wall_repel_distance: f64,
    pub mutual_destruction_radius: f64,
    /// Phase advance per tick of the adversary pulse.
    pub pulse_speed: f64,

    pub signal_duration: f64,
    pub signal_cooldown: f64,
    pub signal_propagation_delay: f64,

    pub explosion_particle_count: usize,
    pub explosion_lifetime: f64,
    pub explosion_min_speed: f64,
    pub explosion_max_speed: f64,
    pub explosion_particle_size: f64,

    pub long_press_ms: f64,
    /// Pointer travel that cancels a pending long press.
    pub long_press_slop: f64,
    pub tracking_alpha: f64,
    pub trail_fade_alpha: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_boids: 85,
            boid_size: 2.5,
            max_speed: 6.0,
            max_force: 0.35,
            separation_weight: 5.2,
            alignment_weight: 3.0,
            cohesion_weight: 4.0,
            attraction_weight: 1.0,
            separation_radius: 80.0,
            alignment_radius: 50.0,
            cohesion_radius: 120.0,
            attraction_radius: 300.0,
            boid_turn_rate: 360.0,
            assumed_fps: 60.0,
            neighbor_count: 3,

            bad_particle_size: 4.0,
            bad_particle_max_speed: 7.0,
            bad_particle_turn_rate: 240.0,
            bad_particle_escape_radius: 160.0,
            bad_particle_detection_radius: 120.0,
            bad_particle_attraction_force: 4.0,
            look_ahead_frames: 12.0,
            wall_repel_distance: 120.0,
            mutual_destruction_radius: 8.0,
            pulse_speed: 0.1,

            signal_duration: 500.0,
            signal_cooldown: 1500.0,
            signal_propagation_delay: 150.0,

            explosion_particle_count: 24,
            explosion_lifetime: 800.0,
            explosion_min_speed: 1.0,
            explosion_max_speed: 4.0,
            explosion_particle_size: 1.5,

            long_press_ms: 500.0,
            long_press_slop: 10.0,
            tracking_alpha: 0.1,
            trail_fade_alpha: 0.03,
        }
    }
}

impl Settings {
    /// Tuning of the plain cursor-following flock. Heading changes are
    /// effectively unbounded and adversaries are slower. Speed still grows by
    /// half the forward force component per tick, so acceleration along the
    /// heading is softer than adding the force to the velocity outright.
    pub fn classic() -> Self {
        Self {
            boid_turn_rate: 10_800.0,
            bad_particle_max_speed: 5.0,
            bad_particle_attraction_force: 1.0,
            look_ahead_frames: 0.0,
            ..Self::default()
        }
    }

    #[cfg(feature = "std")]
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "std")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshot of the simulation exposed to the page and the CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusReport {
    pub tick: u64,
    pub boid_count: usize,
    pub adversary_count: usize,
    pub explosion_count: usize,
    pub signaling_count: usize,
    /// True while any adversary is alive.
    pub adversary_alive: bool,
    /// Smoothed point followed by the cursor decoration layer.
    pub tracking_point: Position,
}

#[cfg(feature = "std")]
impl StatusReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0);
        let p2 = Position::new(3.0, 4.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        let settings = Settings::from_json_str(r#"{ "num_boids": 12, "max_speed": 3.5 }"#)
            .expect("valid settings json");
        assert_eq!(settings.num_boids, 12);
        assert_eq!(settings.max_speed, 3.5);
        assert_eq!(settings.cohesion_radius, Settings::default().cohesion_radius);
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = Settings::classic();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn test_settings_rejects_wrong_types() {
        assert!(Settings::from_json_str(r#"{ "num_boids": "many" }"#).is_err());
    }

    #[test]
    fn test_status_report_json() {
        let report = StatusReport {
            tick: 3,
            boid_count: 10,
            adversary_count: 1,
            explosion_count: 0,
            signaling_count: 2,
            adversary_alive: true,
            tracking_point: Position::new(1.0, 2.0),
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"adversary_alive\":true"));
        assert!(json.contains("\"tracking_point\":{\"x\":1.0,\"y\":2.0}"));
    }
}
