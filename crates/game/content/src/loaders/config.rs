//! Combat configuration loader.

use std::path::Path;

use anyhow::Context;
use lair_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their [`CombatConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in config file {}", path.display()))
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// The built-in tuning shipped with this crate.
    pub fn builtin() -> LoadResult<CombatConfig> {
        Self::parse(crate::BUILTIN_COMBAT)
    }

    fn validate(config: &CombatConfig) -> LoadResult<()> {
        anyhow::ensure!(
            (1..=CombatConfig::MAX_ROUND_CAP).contains(&config.round_cap),
            "round_cap must be between 1 and {} (got {})",
            CombatConfig::MAX_ROUND_CAP,
            config.round_cap
        );
        anyhow::ensure!(
            config.attack_cooldown.is_finite() && config.attack_cooldown > 0.0,
            "attack_cooldown must be positive (got {})",
            config.attack_cooldown
        );
        let (first, second) = config.initial_cooldowns;
        anyhow::ensure!(
            first.is_finite() && second.is_finite(),
            "initial_cooldowns must be finite"
        );
        anyhow::ensure!(
            config.spawn_interval.is_finite() && config.spawn_interval > 0.0,
            "spawn_interval must be positive (got {})",
            config.spawn_interval
        );
        anyhow::ensure!(
            config.initial_spawn_delay.is_finite() && config.initial_spawn_delay >= 0.0,
            "initial_spawn_delay must not be negative (got {})",
            config.initial_spawn_delay
        );
        anyhow::ensure!(
            config.hero_quota.scalar.is_finite() && config.hero_quota.scalar >= 0.0,
            "hero_quota.scalar must not be negative (got {})",
            config.hero_quota.scalar
        );
        anyhow::ensure!(config.room_capacity > 0, "room_capacity must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use lair_core::HeroQuota;

    use super::*;

    #[test]
    fn builtin_matches_defaults() {
        assert_eq!(ConfigLoader::builtin().unwrap(), CombatConfig::default());
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse("round_cap = 8\n[hero_quota]\nflat = 2\n").unwrap();
        assert_eq!(config.round_cap, 8);
        assert_eq!(config.hero_quota, HeroQuota::new(3, 1.0, 2));
        assert_eq!(config.spawn_interval, CombatConfig::DEFAULT_SPAWN_INTERVAL);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(ConfigLoader::parse("round_cap = 0").is_err());
        assert!(ConfigLoader::parse("round_cap = 100").is_err());
        assert!(ConfigLoader::parse("spawn_interval = 0.0").is_err());
        assert!(ConfigLoader::parse("room_capacity = 0").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "attack_cooldown = 0.75").unwrap();
        writeln!(file, "initial_cooldowns = [0.25, 2.0]").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.attack_cooldown, 0.75);
        assert_eq!(config.initial_cooldowns, (0.25, 2.0));
    }

    #[test]
    fn load_reports_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "round_cap = \"six\"").unwrap();

        let err = ConfigLoader::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains(&file.path().display().to_string()));
    }
}
