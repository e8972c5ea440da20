//! Command-line flags.
use std::path::PathBuf;

use clap::Parser;
use lair_runtime::RuntimeConfig;

/// Simulate one wave of heroes against a battle room garrison
#[derive(Parser, Debug)]
#[command(name = "lair")]
#[command(version)]
pub struct Args {
    /// RNG seed (overrides LAIR_SEED; defaults to the clock)
    #[arg(long)]
    pub seed: Option<u32>,

    /// Simulated seconds per tick (overrides LAIR_TICK_SECONDS)
    #[arg(long)]
    pub tick: Option<f64>,

    /// Tick limit for the wave (overrides LAIR_MAX_TICKS)
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Combat tuning TOML (overrides LAIR_CONFIG_PATH)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Unit catalogue RON (overrides LAIR_TEMPLATES_PATH)
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

impl Args {
    /// Layer the flags over an environment-derived configuration.
    pub fn apply(self, mut config: RuntimeConfig) -> RuntimeConfig {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(tick) = self.tick {
            config.tick_seconds = tick;
        }
        if let Some(limit) = self.max_ticks {
            config.max_ticks = limit;
        }
        if self.config.is_some() {
            config.config_path = self.config;
        }
        if self.templates.is_some() {
            config.templates_path = self.templates;
        }
        config
    }
}
