//! Deterministic combat rules for the dungeon-defense game.
//!
//! `lair-core` holds the combat simulation: the seeded RNG, per-unit stats
//! with one-shot modifiers, the per-attack damage pipeline, the paired
//! encounter state machine and the battle manager that supervises encounters
//! and hero spawning. It performs no I/O. Rendering, pathing and asset
//! loading live elsewhere and reach combat only through the traits in
//! [`env`] and [`traits`].
//!
//! All combat advances through [`BattleManager::update`], one call per frame.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;
pub mod traits;

pub use combat::{AttackContext, AttackId, DamagePipeline};
pub use config::{CombatConfig, HeroQuota};
pub use engine::{
    BattleManager, DisengageCause, Encounter, EncounterId, EncounterState, HeroSpawner,
};
pub use env::{
    CombatEnv, CombatEvent, CombatEventKind, EventDispatcher, FixedSequence, HeroPool,
    ListenerId, NotificationSink, NullSink, RandomExt, RandomSource, RandomStream, Ranked,
    SpawnPool,
};
pub use error::{CombatError, ErrorSeverity, GameError, ListenerError};
pub use state::{BattleRoom, Roster, Unit, UnitId, UnitTemplate};
pub use stats::{StatComponent, StatKind, UnitStats};
pub use traits::{Combatant, Faction};
