//! Encounter scheduling and wave supervision.
//!
//! The [`BattleManager`] is the single entry point for advancing combat. It
//! owns the RNG, the live encounters and the hero spawner, and is driven by
//! one `update(dt)` call per frame. Nothing here blocks or runs on another
//! thread; draw order on the owned RNG is part of the reproducibility
//! contract.

mod encounter;
mod spawner;

pub use encounter::{AttackLog, DisengageCause, Encounter, EncounterId, EncounterState};
pub use spawner::HeroSpawner;

use tracing::{debug, info};

use crate::config::CombatConfig;
use crate::env::{CombatEnv, RandomSource};
use crate::error::CombatError;
use crate::state::{BattleRoom, Roster, UnitId};
use crate::traits::{Combatant, Faction};

/// Supervises live encounters and hero-spawn pacing for one session.
#[derive(Clone, Debug)]
pub struct BattleManager<R: RandomSource> {
    config: CombatConfig,
    rng: R,
    encounters: Vec<Encounter>,
    spawner: HeroSpawner,
    running: bool,
    next_encounter: u32,
}

impl<R: RandomSource> BattleManager<R> {
    pub fn new(config: CombatConfig, rng: R) -> Self {
        let spawner = HeroSpawner::from_config(&config);
        Self {
            config,
            rng,
            encounters: Vec::new(),
            spawner,
            running: false,
            next_encounter: 0,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn spawner(&self) -> &HeroSpawner {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut HeroSpawner {
        &mut self.spawner
    }

    /// Live encounters, in creation order.
    pub fn encounters(&self) -> &[Encounter] {
        &self.encounters
    }

    pub fn encounter(&self, id: EncounterId) -> Option<&Encounter> {
        self.encounters.iter().find(|encounter| encounter.id() == id)
    }

    /// True if `unit` takes part in an encounter that is still in progress.
    pub fn is_engaged(&self, unit: UnitId) -> bool {
        self.encounters
            .iter()
            .any(|encounter| encounter.is_in_progress() && encounter.involves(unit))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin a wave: the spawner starts over and the battle is running.
    pub fn start_wave(&mut self) {
        self.spawner.reset();
        self.running = true;
        info!(
            target: "lair::battle",
            max_heroes = self.spawner.max_heroes(),
            "Wave started"
        );
    }

    /// Pair two units and open an encounter with `attacker` as unit1.
    ///
    /// Neither unit is checked for an existing engagement; use
    /// [`engage_in_room`](Self::engage_in_room) for guarded pairing.
    pub fn engage(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        roster: &mut Roster,
    ) -> Result<EncounterId, CombatError> {
        let (first, second) = roster.pair_mut(attacker, defender)?;
        first.set_opponent(Some(defender));
        second.set_opponent(Some(attacker));

        let id = EncounterId(self.next_encounter);
        self.next_encounter += 1;
        self.encounters
            .push(Encounter::new(id, attacker, defender, &self.config));
        Ok(id)
    }

    /// Pair an arriving hero with the first living, unengaged monster in
    /// `room`. The monster strikes as unit1.
    ///
    /// Returns `None` if the hero is dead or already engaged, or if no monster
    /// is available.
    pub fn engage_in_room(
        &mut self,
        hero: UnitId,
        room: &BattleRoom,
        roster: &mut Roster,
    ) -> Result<Option<EncounterId>, CombatError> {
        if !roster.unit(hero)?.is_alive() || self.is_engaged(hero) {
            return Ok(None);
        }
        let monster = room.garrison().iter().copied().find(|&monster| {
            roster.get(monster).is_some_and(|unit| unit.is_alive()) && !self.is_engaged(monster)
        });
        match monster {
            Some(monster) => self.engage(monster, hero, roster).map(Some),
            None => Ok(None),
        }
    }

    /// Advance one frame.
    ///
    /// Ticks every encounter and drops the ones that ended, advances the
    /// spawner while the wave is running, then checks whether the battle is
    /// over. Returns the hero spawned this frame, if any.
    pub fn update(
        &mut self,
        dt: f64,
        env: &mut CombatEnv<'_>,
    ) -> Result<Option<UnitId>, CombatError> {
        for encounter in &mut self.encounters {
            encounter.update(dt, &mut *env.roster, &mut *env.sink)?;
        }
        self.encounters.retain(Encounter::is_in_progress);

        let mut spawned = None;
        if self.running && self.spawner.update(dt) {
            let hero = env.spawn_pool.spawn_hero(&mut self.rng, &mut *env.roster)?;
            self.spawner.record_spawn();
            debug!(
                target: "lair::battle",
                hero = %hero,
                spawned = self.spawner.spawned(),
                max_heroes = self.spawner.max_heroes(),
                "Spawn requested"
            );
            spawned = Some(hero);
        }

        self.check_battle_over(&*env.roster);
        Ok(spawned)
    }

    /// End the battle if the spawner is done, no encounter is in progress and
    /// no hero is left alive. Returns true if the battle ended on this call.
    pub fn check_battle_over(&mut self, roster: &Roster) -> bool {
        if !self.running || !self.spawner.is_finished() {
            return false;
        }
        if self.encounters.iter().any(Encounter::is_in_progress) {
            return false;
        }
        if roster.count_living(Faction::Hero) > 0 {
            return false;
        }
        self.running = false;
        info!(
            target: "lair::battle",
            heroes = self.spawner.spawned(),
            "Battle over"
        );
        true
    }
}
