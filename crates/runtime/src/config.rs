//! Runtime configuration and its environment loader.
use std::env;
use std::path::PathBuf;

use lair_content::{Catalogue, ConfigLoader, TemplateLoader};
use lair_core::{CombatConfig, RandomStream};

use crate::error::{Result, RuntimeError};

/// Settings that sit outside the combat rules: seeding, frame pacing and
/// where to read content from.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Seed for the battle RNG. `None` seeds from the clock.
    pub seed: Option<u32>,
    /// Simulated seconds per tick.
    pub tick_seconds: f64,
    /// Safety limit on ticks per wave.
    pub max_ticks: u64,
    /// Combat tuning (TOML). `None` uses the built-in tuning.
    pub config_path: Option<PathBuf>,
    /// Unit catalogue (RON). `None` uses the built-in catalogue.
    pub templates_path: Option<PathBuf>,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_SECONDS: f64 = 1.0 / 60.0;
    pub const DEFAULT_MAX_TICKS: u64 = 100_000;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `LAIR_SEED` - RNG seed (default: clock)
    /// - `LAIR_TICK_SECONDS` - seconds per tick (default: 1/60)
    /// - `LAIR_MAX_TICKS` - tick limit per wave (default: 100000)
    /// - `LAIR_CONFIG_PATH` - combat tuning TOML (default: built-in)
    /// - `LAIR_TEMPLATES_PATH` - unit catalogue RON (default: built-in)
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.seed = read_env::<u32>("LAIR_SEED");

        if let Some(seconds) =
            read_env::<f64>("LAIR_TICK_SECONDS").filter(|s| s.is_finite() && *s > 0.0)
        {
            config.tick_seconds = seconds;
        }

        if let Some(limit) = read_env::<u64>("LAIR_MAX_TICKS") {
            config.max_ticks = limit.max(1);
        }

        config.config_path = env::var("LAIR_CONFIG_PATH").ok().map(PathBuf::from);
        config.templates_path = env::var("LAIR_TEMPLATES_PATH").ok().map(PathBuf::from);

        config
    }

    /// The battle RNG this configuration asks for.
    pub fn rng(&self) -> RandomStream {
        match self.seed {
            Some(seed) => RandomStream::new(seed),
            None => RandomStream::from_time(),
        }
    }

    pub fn load_combat_config(&self) -> Result<CombatConfig> {
        match &self.config_path {
            Some(path) => ConfigLoader::load(path),
            None => ConfigLoader::builtin(),
        }
        .map_err(RuntimeError::load("combat config"))
    }

    pub fn load_catalogue(&self) -> Result<Catalogue> {
        match &self.templates_path {
            Some(path) => TemplateLoader::load(path).map(Catalogue::new),
            None => Catalogue::builtin(),
        }
        .map_err(RuntimeError::load("unit catalogue"))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
            max_ticks: Self::DEFAULT_MAX_TICKS,
            config_path: None,
            templates_path: None,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_use_builtin_content() {
        let config = RuntimeConfig::default();
        assert_eq!(config.tick_seconds, RuntimeConfig::DEFAULT_TICK_SECONDS);
        assert_eq!(config.load_combat_config().unwrap(), CombatConfig::default());

        let catalogue = config.load_catalogue().unwrap();
        assert!(!catalogue.heroes.is_empty());
        assert!(!catalogue.monsters.is_empty());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = RuntimeConfig {
            seed: Some(42),
            ..RuntimeConfig::default()
        };
        assert_eq!(config.rng().seed(), 42);
        assert_eq!(config.rng().next_u32(), RandomStream::new(42).next_u32());
    }

    #[test]
    fn load_failures_name_what_was_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "room_capacity = 0").unwrap();

        let config = RuntimeConfig {
            config_path: Some(file.path().to_path_buf()),
            ..RuntimeConfig::default()
        };
        let err = config.load_combat_config().unwrap_err();
        assert!(matches!(err, RuntimeError::Load { what: "combat config", .. }));
        assert_eq!(err.to_string(), "failed to load combat config");
    }

    #[test]
    fn missing_catalogue_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig {
            templates_path: Some(dir.path().join("units.ron")),
            ..RuntimeConfig::default()
        };
        assert!(config.load_catalogue().is_err());
    }
}
