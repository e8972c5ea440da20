//! Hero arrival pacing.

use crate::config::{CombatConfig, HeroQuota};
use crate::error::CombatError;

/// Paces hero arrival within a wave.
///
/// A wave spawns `max_heroes = floor(base × scalar) + flat` heroes, one per
/// `interval` seconds. Quota adjustments are permanent and carry over into
/// every later wave.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroSpawner {
    cooldown: f64,
    interval: f64,
    initial_delay: f64,
    base: u32,
    scalar: f64,
    flat: u32,
    spawned: u32,
}

impl HeroSpawner {
    pub fn new(quota: HeroQuota, interval: f64, initial_delay: f64) -> Self {
        Self {
            cooldown: initial_delay,
            interval,
            initial_delay,
            base: quota.base,
            scalar: quota.scalar,
            flat: quota.flat,
            spawned: 0,
        }
    }

    pub fn from_config(config: &CombatConfig) -> Self {
        Self::new(
            config.hero_quota,
            config.spawn_interval,
            config.initial_spawn_delay,
        )
    }

    pub fn max_heroes(&self) -> u32 {
        (f64::from(self.base) * self.scalar).floor().max(0.0) as u32 + self.flat
    }

    /// Heroes requested so far this wave.
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn is_finished(&self) -> bool {
        self.spawned >= self.max_heroes()
    }

    /// Seconds until the next spawn request.
    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub fn increase_base_count(&mut self) {
        self.base += 1;
    }

    /// Add to the quota multiplier.
    pub fn scale(&mut self, scalar: f64) -> Result<(), CombatError> {
        if !scalar.is_finite() {
            return Err(CombatError::invalid(
                "HeroSpawner::scale",
                "scalar must be a finite number",
            ));
        }
        self.scalar += scalar;
        Ok(())
    }

    pub fn increase(&mut self, amount: u32) {
        self.flat += amount;
    }

    /// Start a new wave: nothing spawned, first hero after the initial delay.
    pub fn reset(&mut self) {
        self.spawned = 0;
        self.cooldown = self.initial_delay;
    }

    /// Advance the timer. Returns true when a hero should spawn now.
    ///
    /// A due spawn stays due until [`record_spawn`](Self::record_spawn) is
    /// called for it.
    pub fn update(&mut self, dt: f64) -> bool {
        if self.is_finished() {
            return false;
        }
        self.cooldown -= dt;
        self.cooldown <= 0.0
    }

    /// Count a spawned hero and restart the interval.
    pub fn record_spawn(&mut self) {
        self.cooldown = self.interval;
        self.spawned += 1;
    }
}

impl Default for HeroSpawner {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(spawner: &mut HeroSpawner, dt: f64) -> bool {
        let due = spawner.update(dt);
        if due {
            spawner.record_spawn();
        }
        due
    }

    #[test]
    fn quota_formula() {
        let mut spawner = HeroSpawner::default();
        assert_eq!(spawner.max_heroes(), 3);
        spawner.increase(2);
        assert_eq!(spawner.max_heroes(), 5);

        spawner.increase_base_count();
        spawner.scale(0.5).unwrap();
        // floor(4 × 1.5) + 2
        assert_eq!(spawner.max_heroes(), 8);
        assert!(spawner.scale(f64::NAN).is_err());
    }

    #[test]
    fn spawns_on_interval_until_quota_met() {
        let mut spawner = HeroSpawner::new(HeroQuota::new(2, 1.0, 0), 2.0, 0.0);

        assert!(tick(&mut spawner, 0.5));
        assert!(!tick(&mut spawner, 1.0));
        assert!(tick(&mut spawner, 1.0));
        assert!(spawner.is_finished());
        assert!(!tick(&mut spawner, 10.0));
        assert_eq!(spawner.spawned(), 2);
    }

    #[test]
    fn initial_delay_holds_back_first_spawn() {
        let mut spawner = HeroSpawner::new(HeroQuota::new(1, 1.0, 0), 2.0, 3.0);
        assert!(!tick(&mut spawner, 2.0));
        assert!(tick(&mut spawner, 1.0));
    }

    #[test]
    fn reset_starts_a_new_wave_with_the_raised_quota() {
        let mut spawner = HeroSpawner::new(HeroQuota::new(1, 1.0, 0), 1.0, 0.0);
        assert!(tick(&mut spawner, 0.1));
        assert!(spawner.is_finished());

        spawner.increase(1);
        spawner.reset();
        assert!(!spawner.is_finished());
        assert_eq!(spawner.spawned(), 0);
        assert!(tick(&mut spawner, 0.1));
        assert!(tick(&mut spawner, 1.0));
        assert!(spawner.is_finished());
    }

    #[test]
    fn unrecorded_spawn_stays_due() {
        let mut spawner = HeroSpawner::new(HeroQuota::new(1, 1.0, 0), 2.0, 0.0);
        assert!(spawner.update(0.5));
        assert!(spawner.update(0.5));
        assert_eq!(spawner.spawned(), 0);
        assert!(!spawner.is_finished());

        spawner.record_spawn();
        assert_eq!(spawner.spawned(), 1);
        assert!(spawner.is_finished());
        assert!(!spawner.update(10.0));
    }

    #[test]
    fn zero_quota_is_finished_immediately() {
        let mut spawner = HeroSpawner::new(HeroQuota::new(0, 1.0, 0), 1.0, 0.0);
        assert!(spawner.is_finished());
        assert!(!tick(&mut spawner, 5.0));
    }
}
