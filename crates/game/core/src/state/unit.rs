use std::fmt;

use crate::env::Ranked;
use crate::stats::UnitStats;
use crate::traits::{Combatant, Faction};

/// Handle into a [`Roster`](super::Roster). Stable for the life of the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Catalogue entry a unit is spawned from. Pure data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub name: String,
    pub faction: Faction,
    /// Star rank; drives weighted selection in spawn pools.
    pub rank: u8,
    pub life: i32,
    pub attack: i32,
    pub defense: f64,
    #[cfg_attr(feature = "serde", serde(default = "UnitTemplate::default_dexterity"))]
    pub dexterity: f64,
}

impl UnitTemplate {
    pub fn new(
        name: impl Into<String>,
        faction: Faction,
        rank: u8,
        life: i32,
        attack: i32,
        defense: f64,
    ) -> Self {
        Self {
            name: name.into(),
            faction,
            rank,
            life,
            attack,
            defense,
            dexterity: Self::default_dexterity(),
        }
    }

    #[must_use]
    pub fn with_dexterity(mut self, dexterity: f64) -> Self {
        self.dexterity = dexterity;
        self
    }

    /// Stat block a freshly spawned unit of this template starts with.
    pub fn stats(&self) -> UnitStats {
        UnitStats::new(self.life, self.attack, self.defense).with_dexterity(self.dexterity)
    }

    const fn default_dexterity() -> f64 {
        1.0
    }
}

impl Ranked for UnitTemplate {
    fn rank(&self) -> u8 {
        self.rank
    }
}

/// A live combatant in the roster.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    id: UnitId,
    name: String,
    faction: Faction,
    rank: u8,
    stats: UnitStats,
    opponent: Option<UnitId>,
    attack_animations: u32,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, faction: Faction, stats: UnitStats) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            rank: 1,
            stats,
            opponent: None,
            attack_animations: 0,
        }
    }

    /// Spawn from a template. Stats are rebuilt from base values; nothing is
    /// shared with the template or with siblings spawned from it.
    pub fn from_template(id: UnitId, template: &UnitTemplate) -> Self {
        Self {
            rank: template.rank,
            ..Self::new(id, template.name.clone(), template.faction, template.stats())
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn stats(&self) -> &UnitStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut UnitStats {
        &mut self.stats
    }

    /// How many times this unit's attack animation has been triggered.
    pub fn attack_animations(&self) -> u32 {
        self.attack_animations
    }
}

impl Combatant for Unit {
    fn id(&self) -> UnitId {
        self.id
    }

    fn life(&self) -> i32 {
        self.stats.life()
    }

    fn attack(&mut self) -> Option<i32> {
        Some(self.stats.evaluate_attack())
    }

    fn defense(&self) -> f64 {
        self.stats.defense()
    }

    fn dexterity(&mut self) -> f64 {
        self.stats.evaluate_dexterity()
    }

    fn damage(&mut self, amount: i32) {
        self.stats.damage(amount);
    }

    fn heal(&mut self, amount: i32) {
        self.stats.heal(amount);
    }

    fn play_attack_animation(&mut self) {
        self.attack_animations += 1;
    }

    fn opponent(&self) -> Option<UnitId> {
        self.opponent
    }

    fn set_opponent(&mut self, opponent: Option<UnitId>) {
        self.opponent = opponent;
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.id)
    }
}
