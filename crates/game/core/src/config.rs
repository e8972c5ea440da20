/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Total attacks (both sides combined) after which an encounter disengages.
    pub round_cap: usize,
    /// Cooldown a unit returns to after it attacks.
    pub attack_cooldown: f64,
    /// Cooldowns of (unit1, unit2) when an encounter begins.
    pub initial_cooldowns: (f64, f64),
    /// Shared encounter cooldown. Carried on every encounter, not yet consumed.
    pub final_cooldown: f64,
    /// Seconds between hero spawns.
    pub spawn_interval: f64,
    /// Seconds before the first hero of a wave spawns.
    pub initial_spawn_delay: f64,
    /// Number of heroes a wave spawns.
    pub hero_quota: HeroQuota,
    /// Monsters a single battle room can garrison.
    pub room_capacity: usize,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound for `round_cap`; sizes the per-encounter attack log.
    pub const MAX_ROUND_CAP: usize = 24;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ROUND_CAP: usize = 6;
    pub const DEFAULT_ATTACK_COOLDOWN: f64 = 1.0;
    pub const DEFAULT_INITIAL_COOLDOWNS: (f64, f64) = (1.0, 0.5);
    pub const DEFAULT_FINAL_COOLDOWN: f64 = 1.0;
    pub const DEFAULT_SPAWN_INTERVAL: f64 = 2.0;
    pub const DEFAULT_ROOM_CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self {
            round_cap: Self::DEFAULT_ROUND_CAP,
            attack_cooldown: Self::DEFAULT_ATTACK_COOLDOWN,
            initial_cooldowns: Self::DEFAULT_INITIAL_COOLDOWNS,
            final_cooldown: Self::DEFAULT_FINAL_COOLDOWN,
            spawn_interval: Self::DEFAULT_SPAWN_INTERVAL,
            initial_spawn_delay: 0.0,
            hero_quota: HeroQuota::default(),
            room_capacity: Self::DEFAULT_ROOM_CAPACITY,
        }
    }

    pub fn with_hero_quota(mut self, quota: HeroQuota) -> Self {
        self.hero_quota = quota;
        self
    }

    /// Round cap clamped to what the attack log can hold.
    pub fn effective_round_cap(&self) -> usize {
        self.round_cap.clamp(1, Self::MAX_ROUND_CAP)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs to `max_heroes = floor(base * scalar) + flat`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeroQuota {
    pub base: u32,
    pub scalar: f64,
    pub flat: u32,
}

impl HeroQuota {
    pub const fn new(base: u32, scalar: f64, flat: u32) -> Self {
        Self { base, scalar, flat }
    }
}

impl Default for HeroQuota {
    fn default() -> Self {
        Self::new(3, 1.0, 0)
    }
}
