//! Collaborators the combat core consumes.
//!
//! The RNG, the notification sink and the spawn pool are abstract so a session
//! can plug in real implementations and tests can plug in scripted ones. The
//! [`CombatEnv`] aggregate bundles the per-tick collaborators so the battle
//! manager can reach everything it needs without owning any of it.
mod notify;
mod rng;
mod spawn;

pub use notify::{
    AttackListener, CombatEvent, CombatEventKind, DeathListener, EventDispatcher, ListenerId,
    NotificationSink, NullSink,
};
pub use rng::{FixedSequence, RandomExt, RandomSource, RandomStream, Ranked};
pub use spawn::{HeroPool, SpawnPool};

use crate::state::Roster;

/// Mutable collaborators borrowed for the duration of one manager tick.
///
/// Fields are public so callers can borrow them disjointly.
pub struct CombatEnv<'a> {
    pub roster: &'a mut Roster,
    pub spawn_pool: &'a mut dyn SpawnPool,
    pub sink: &'a mut dyn NotificationSink,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        roster: &'a mut Roster,
        spawn_pool: &'a mut dyn SpawnPool,
        sink: &'a mut dyn NotificationSink,
    ) -> Self {
        Self {
            roster,
            spawn_pool,
            sink,
        }
    }
}
