use anyhow::{Context, Result};
use boidfield_cli::{load_settings, run, Args, RunOptions};
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = load_settings(args.config.as_deref(), args.classic, args.boids)
        .context("Failed to load settings")?;

    log::info!(
        "Running {} boids on {}x{} for {} ticks (seed {})",
        settings.num_boids,
        args.width,
        args.height,
        args.ticks,
        args.seed
    );

    let report = run(settings, &RunOptions::from(&args)).context("Simulation failed")?;
    let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
    println!("{}", json);

    Ok(())
}
