//! Headless runner for the backdrop simulation.
//!
//! Drives [`Simulation`] with a synthetic clock, replays scripted adversary
//! spawns and reports what happened. Used for tuning settings files without
//! a browser.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use boidfield_core::{DrawCommand, RenderTarget, Settings, Simulation};
use boidfield_shared::StatusReport;
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid backdrop runner", long_about = None)]
pub struct Args {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,

    /// Override the number of boids
    #[arg(short, long)]
    pub boids: Option<usize>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    pub ticks: u64,

    /// RNG seed
    #[arg(short, long, default_value_t = 1)]
    pub seed: u32,

    /// JSON settings file; missing fields use the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Spawn an adversary, as `x,y@tick` (repeatable)
    #[arg(long = "spawn")]
    pub spawns: Vec<SpawnCommand>,

    /// Pointer position, as `x,y`
    #[arg(long, value_parser = parse_point)]
    pub pointer: Option<(f64, f64)>,

    /// Milliseconds per tick
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    pub frame_ms: f64,

    /// Start from the classic tuning instead of the default one
    #[arg(long, conflicts_with = "config")]
    pub classic: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

fn parse_point(s: &str) -> Result<(f64, f64)> {
    let (x, y) = s
        .split_once(',')
        .with_context(|| format!("expected `x,y`, got `{}`", s))?;
    let x = x.trim().parse().with_context(|| format!("bad x in `{}`", s))?;
    let y = y.trim().parse().with_context(|| format!("bad y in `{}`", s))?;
    Ok((x, y))
}

/// Scripted adversary spawn at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnCommand {
    pub x: f64,
    pub y: f64,
    pub tick: u64,
}

impl FromStr for SpawnCommand {
    type Err = anyhow::Error;

    /// `x,y@tick`, or `x,y` for tick 0.
    fn from_str(s: &str) -> Result<Self> {
        let (point, tick) = match s.split_once('@') {
            Some((point, tick)) => {
                let tick = tick
                    .trim()
                    .parse()
                    .with_context(|| format!("bad tick in `{}`", s))?;
                (point, tick)
            }
            None => (s, 0),
        };
        let (x, y) = parse_point(point)?;
        if !x.is_finite() || !y.is_finite() {
            bail!("spawn position must be finite: `{}`", s);
        }
        Ok(Self { x, y, tick })
    }
}

/// Counts what would have been drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadlessTarget {
    pub fades: usize,
    pub circles: usize,
    pub lines: usize,
}

impl RenderTarget for HeadlessTarget {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Fade { .. } => self.fades += 1,
            DrawCommand::Circle { .. } => self.circles += 1,
            DrawCommand::Line { .. } => self.lines += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub width: f64,
    pub height: f64,
    pub ticks: u64,
    pub frame_ms: f64,
    pub seed: u32,
    pub spawns: Vec<SpawnCommand>,
    pub pointer: Option<(f64, f64)>,
}

impl From<&Args> for RunOptions {
    fn from(args: &Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            ticks: args.ticks,
            frame_ms: args.frame_ms,
            seed: args.seed,
            spawns: args.spawns.clone(),
            pointer: args.pointer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: StatusReport,
    pub collisions: usize,
    pub signals_started: usize,
    pub spawns_accepted: usize,
    pub spawns_rejected: usize,
    pub draws: HeadlessTarget,
}

/// Settings from an optional JSON file, with command-line overrides applied.
pub fn load_settings(config: Option<&Path>, classic: bool, boids: Option<usize>) -> Result<Settings> {
    let mut settings = match config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            Settings::from_json_str(&json)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        }
        None if classic => Settings::classic(),
        None => Settings::default(),
    };

    if let Some(count) = boids {
        settings.num_boids = count;
    }
    Ok(settings)
}

pub fn run(settings: Settings, options: &RunOptions) -> Result<RunReport> {
    if !(options.width > 0.0 && options.height > 0.0) {
        bail!("canvas must have a positive size, got {}x{}", options.width, options.height);
    }
    if !(options.frame_ms > 0.0) {
        bail!("frame duration must be positive, got {}", options.frame_ms);
    }

    let mut sim = Simulation::with_seed(options.width, options.height, settings, options.seed);
    if let Some((x, y)) = options.pointer {
        sim.pointer_moved(x, y);
    }

    let mut report = RunReport {
        status: sim.status(0.0),
        collisions: 0,
        signals_started: 0,
        spawns_accepted: 0,
        spawns_rejected: 0,
        draws: HeadlessTarget::default(),
    };

    let mut now = 0.0;
    for tick in 0..options.ticks {
        now = tick as f64 * options.frame_ms;

        for spawn in options.spawns.iter().filter(|s| s.tick == tick) {
            match sim.spawn_adversary(spawn.x, spawn.y) {
                Ok(_) => {
                    log::info!("Tick {}: adversary spawned at ({}, {})", tick, spawn.x, spawn.y);
                    report.spawns_accepted += 1;
                }
                Err(err) => {
                    log::warn!("Tick {}: spawn at ({}, {}) refused: {}", tick, spawn.x, spawn.y, err);
                    report.spawns_rejected += 1;
                }
            }
        }

        let summary = sim.tick(now, &mut report.draws);
        report.collisions += summary.collisions;
        report.signals_started += summary.signals_started;
        if summary.collisions > 0 {
            log::info!(
                "Tick {}: {} collision(s), {} boids left",
                tick,
                summary.collisions,
                summary.boid_count
            );
        }
    }

    let skipped = options
        .spawns
        .iter()
        .filter(|s| s.tick >= options.ticks)
        .count();
    if skipped > 0 {
        log::warn!("{} spawn(s) scheduled after the last tick were skipped", skipped);
    }

    report.status = sim.status(now);
    Ok(report)
}
