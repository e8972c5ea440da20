//! Headless wave simulator.
//!
//! Loads combat tuning and the unit catalogue (built-in unless a path is
//! given), garrisons one battle room with the first monsters of the
//! catalogue, runs a single wave and logs the report.
//!
//! ```bash
//! RUST_LOG=lair::encounter=trace cargo run -p lair-client -- --seed 7
//! ```
mod args;

use anyhow::{Context, Result};
use clap::Parser;
use lair_runtime::{RuntimeConfig, Session};

use crate::args::Args;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().apply(RuntimeConfig::from_env());
    anyhow::ensure!(
        config.tick_seconds.is_finite() && config.tick_seconds > 0.0,
        "--tick must be positive (got {})",
        config.tick_seconds
    );

    let combat = config.load_combat_config()?;
    let catalogue = config.load_catalogue()?;
    let garrison: Vec<_> = catalogue
        .monsters
        .iter()
        .take(combat.room_capacity)
        .cloned()
        .collect();
    anyhow::ensure!(!garrison.is_empty(), "catalogue has no monsters to garrison the room");

    let rng = config.rng();
    tracing::info!(seed = rng.seed(), "Starting lair simulation");

    let mut session = Session::new(combat, rng, catalogue.heroes, &garrison)
        .context("failed to set up the battle room")?;
    let report = session.run_wave(config.tick_seconds, config.max_ticks)?;

    tracing::info!(
        outcome = %report.outcome,
        ticks = report.ticks,
        elapsed = report.elapsed,
        heroes_spawned = report.heroes_spawned,
        heroes_defeated = report.heroes_defeated,
        monsters_lost = report.monsters_lost,
        attacks = report.attacks,
        deaths = report.deaths,
        "Wave report"
    );
    for unit in session.roster().iter() {
        tracing::debug!(unit = %unit, life = unit.stats().life(), "Final state");
    }

    Ok(())
}
