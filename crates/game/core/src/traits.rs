//! Behavioral traits and identity for combatants.
//!
//! Combat never inspects concrete unit types. Encounters and attacks work
//! against the [`Combatant`] capability surface, and hero- or monster-specific
//! behavior is layered on by composition (spawn pools, rooms) rather than by
//! subtyping.

use crate::state::UnitId;

/// Which side of the dungeon a unit fights for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// Invaders spawned in waves.
    Hero,
    /// Defenders garrisoned in rooms.
    Monster,
}

impl Faction {
    pub const fn opposing(self) -> Self {
        match self {
            Self::Hero => Self::Monster,
            Self::Monster => Self::Hero,
        }
    }
}

/// Everything combat needs from a unit.
///
/// `attack` and `dexterity` fold pending stat modifiers before reading, so
/// they take `&mut self`. The remaining reads are pure.
pub trait Combatant {
    fn id(&self) -> UnitId;

    fn life(&self) -> i32;

    /// Current attack power, or `None` for units that cannot attack.
    fn attack(&mut self) -> Option<i32>;

    fn defense(&self) -> f64;

    /// Attack-speed multiplier applied to cooldown decay.
    fn dexterity(&mut self) -> f64;

    fn is_alive(&self) -> bool {
        self.life() > 0
    }

    fn damage(&mut self, amount: i32);

    fn heal(&mut self, amount: i32);

    /// Fire-and-forget presentation hook.
    fn play_attack_animation(&mut self);

    fn opponent(&self) -> Option<UnitId>;

    fn set_opponent(&mut self, opponent: Option<UnitId>);

    /// Called when the unit's encounter ends.
    fn disengage(&mut self) {
        self.set_opponent(None);
    }
}
