//! Paired, timed combat between two units.

use std::fmt;

use arrayvec::ArrayVec;
use tracing::{debug, trace, warn};

use crate::combat::{AttackContext, AttackId};
use crate::config::CombatConfig;
use crate::env::{CombatEvent, NotificationSink};
use crate::error::CombatError;
use crate::state::{Roster, UnitId};
use crate::traits::Combatant;

/// Attack log of one encounter, bounded by the largest permitted round cap.
pub type AttackLog = ArrayVec<AttackContext, { CombatConfig::MAX_ROUND_CAP }>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncounterId(pub u32);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncounterState {
    InProgress,
    /// Terminal.
    Disengaged,
}

/// Why an encounter disengaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DisengageCause {
    Death,
    RoundCap,
}

/// Two units trading attacks on independent cooldowns.
///
/// # Tick
///
/// 1. Both cooldowns decay by `dt × dexterity`.
/// 2. unit1, then unit2: a cooldown at or below zero issues one attack and
///    resets to `attack_cooldown`. An attack that leaves either unit dead
///    disengages the encounter and ends the tick.
/// 3. Once the log holds `round_cap` attacks the encounter disengages
///    whatever the life totals.
///
/// Disengaging happens at most once. Ticking a disengaged encounter is a no-op.
#[derive(Clone, Debug)]
pub struct Encounter {
    id: EncounterId,
    unit1: UnitId,
    unit2: UnitId,
    cooldowns: [f64; 2],
    attack_cooldown: f64,
    /// Reserved: shared post-encounter cooldown. Not consumed yet.
    final_cooldown: f64,
    round_cap: usize,
    attacks: AttackLog,
    state: EncounterState,
    cause: Option<DisengageCause>,
}

impl Encounter {
    pub fn new(id: EncounterId, unit1: UnitId, unit2: UnitId, config: &CombatConfig) -> Self {
        let (first, second) = config.initial_cooldowns;
        debug!(
            target: "lair::encounter",
            encounter = %id,
            unit1 = %unit1,
            unit2 = %unit2,
            "Encounter started"
        );
        Self {
            id,
            unit1,
            unit2,
            cooldowns: [first, second],
            attack_cooldown: config.attack_cooldown,
            final_cooldown: config.final_cooldown,
            round_cap: config.effective_round_cap(),
            attacks: ArrayVec::new(),
            state: EncounterState::InProgress,
            cause: None,
        }
    }

    pub fn id(&self) -> EncounterId {
        self.id
    }

    pub fn unit1(&self) -> UnitId {
        self.unit1
    }

    pub fn unit2(&self) -> UnitId {
        self.unit2
    }

    pub fn involves(&self, unit: UnitId) -> bool {
        self.unit1 == unit || self.unit2 == unit
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == EncounterState::InProgress
    }

    /// Set once the encounter disengages.
    pub fn cause(&self) -> Option<DisengageCause> {
        self.cause
    }

    /// Attacks issued so far, oldest first.
    pub fn attacks(&self) -> &[AttackContext] {
        &self.attacks
    }

    /// Remaining cooldowns of (unit1, unit2).
    pub fn cooldowns(&self) -> (f64, f64) {
        (self.cooldowns[0], self.cooldowns[1])
    }

    pub fn final_cooldown(&self) -> f64 {
        self.final_cooldown
    }

    /// Advance the encounter by `dt` seconds.
    pub fn update(
        &mut self,
        dt: f64,
        roster: &mut Roster,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), CombatError> {
        if !self.is_in_progress() {
            return Ok(());
        }
        // A participant may have been killed outside this encounter.
        if !self.both_alive(roster)? {
            return self.disengage(DisengageCause::Death, roster, sink);
        }

        let sides = [(self.unit1, self.unit2), (self.unit2, self.unit1)];
        for (slot, (actor, _)) in sides.iter().enumerate() {
            let dexterity = roster.unit_mut(*actor)?.dexterity();
            self.cooldowns[slot] -= dt * dexterity;
        }

        for (slot, (actor, opponent)) in sides.into_iter().enumerate() {
            if self.cooldowns[slot] > 0.0 || self.attacks.len() >= self.round_cap {
                continue;
            }
            self.strike(actor, opponent, roster, sink)?;
            self.cooldowns[slot] = self.attack_cooldown;

            if !self.both_alive(roster)? {
                return self.disengage(DisengageCause::Death, roster, sink);
            }
        }

        if self.attacks.len() >= self.round_cap {
            return self.disengage(DisengageCause::RoundCap, roster, sink);
        }
        Ok(())
    }

    fn strike(
        &mut self,
        actor: UnitId,
        opponent: UnitId,
        roster: &mut Roster,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), CombatError> {
        let id = AttackId {
            encounter: self.id,
            seq: self.attacks.len() as u32,
        };
        let mut ctx = AttackContext::new(id, roster.unit_mut(actor)?, opponent)?;
        sink.notify(CombatEvent::Attack(&mut ctx));

        if roster.get(ctx.target()).is_none() {
            warn!(
                target: "lair::encounter",
                encounter = %self.id,
                attack = %ctx.id(),
                redirected = %ctx.target(),
                "Attack redirected to an unknown unit; dropping it"
            );
            ctx.redirect(opponent);
            ctx.set_fail(true);
        }
        let dealt = if ctx.target() == ctx.source() {
            ctx.execute_on_source(roster.unit_mut(ctx.source())?)?
        } else {
            let (source, target) = roster.pair_mut(ctx.source(), ctx.target())?;
            ctx.execute(source, target)?
        };
        trace!(
            target: "lair::encounter",
            encounter = %self.id,
            attack = %ctx.id(),
            attacker = %ctx.source(),
            defender = %ctx.target(),
            damage = dealt,
            failed = ctx.is_failed(),
            "Attack resolved"
        );

        self.attacks.try_push(ctx).map_err(|_| {
            CombatError::invalid("Encounter::strike", "attack log is full")
        })
    }

    fn both_alive(&self, roster: &Roster) -> Result<bool, CombatError> {
        Ok(roster.unit(self.unit1)?.is_alive() && roster.unit(self.unit2)?.is_alive())
    }

    fn disengage(
        &mut self,
        cause: DisengageCause,
        roster: &mut Roster,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), CombatError> {
        if let Some(last) = self.attacks.last() {
            let source_alive = roster.unit(last.source())?.is_alive();
            let target_alive = roster.unit(last.target())?.is_alive();
            if !source_alive || !target_alive {
                sink.notify(CombatEvent::Death(last));
            }
        }

        roster.unit_mut(self.unit1)?.disengage();
        roster.unit_mut(self.unit2)?.disengage();
        self.state = EncounterState::Disengaged;
        self.cause = Some(cause);

        debug!(
            target: "lair::encounter",
            encounter = %self.id,
            cause = %cause,
            attacks = self.attacks.len(),
            "Encounter disengaged"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::env::{EventDispatcher, NullSink};
    use crate::state::UnitTemplate;
    use crate::traits::Faction;

    fn spawn(roster: &mut Roster, faction: Faction, life: i32, attack: i32, dex: f64) -> UnitId {
        let template =
            UnitTemplate::new("Unit", faction, 1, life, attack, 0.0).with_dexterity(dex);
        roster.spawn(&template)
    }

    fn engaged(roster: &mut Roster, a: UnitId, b: UnitId) -> Encounter {
        roster.unit_mut(a).unwrap().set_opponent(Some(b));
        roster.unit_mut(b).unwrap().set_opponent(Some(a));
        Encounter::new(EncounterId(0), a, b, &CombatConfig::default())
    }

    #[test]
    fn unit2_strikes_first_with_default_cooldowns() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 50, 1, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 50, 1, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        encounter.update(0.5, &mut roster, &mut NullSink).unwrap();
        assert_eq!(encounter.attacks().len(), 1);
        assert_eq!(encounter.attacks()[0].source(), b);
        assert_eq!(encounter.cooldowns(), (0.5, 1.0));
    }

    #[test]
    fn dexterity_speeds_up_cooldowns() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 50, 1, 4.0);
        let b = spawn(&mut roster, Faction::Hero, 50, 1, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        encounter.update(0.25, &mut roster, &mut NullSink).unwrap();
        assert_eq!(encounter.attacks().len(), 1);
        assert_eq!(encounter.attacks()[0].source(), a);
    }

    #[test]
    fn round_cap_disengages_after_six_attacks() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 1_000, 1, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 1_000, 1, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        for _ in 0..100 {
            encounter.update(0.25, &mut roster, &mut NullSink).unwrap();
        }
        assert_eq!(encounter.state(), EncounterState::Disengaged);
        assert_eq!(encounter.cause(), Some(DisengageCause::RoundCap));
        assert_eq!(encounter.attacks().len(), 6);
        assert_eq!(roster.unit(a).unwrap().opponent(), None);
        assert_eq!(roster.unit(b).unwrap().opponent(), None);
    }

    #[test]
    fn round_cap_holds_with_simultaneous_strikes() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 1_000, 1, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 1_000, 1, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        // Every tick both cooldowns expire, so two attacks per tick.
        for _ in 0..10 {
            encounter.update(5.0, &mut roster, &mut NullSink).unwrap();
        }
        assert_eq!(encounter.attacks().len(), 6);
        assert!(!encounter.is_in_progress());
    }

    #[test]
    fn death_short_circuits_the_tick() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 50, 20, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 10, 20, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        // Both cooldowns expire this tick; unit1 acts first and kills unit2.
        encounter.update(2.0, &mut roster, &mut NullSink).unwrap();
        assert_eq!(encounter.attacks().len(), 1);
        assert_eq!(encounter.cause(), Some(DisengageCause::Death));
        assert_eq!(roster.unit(a).unwrap().life(), 50);

        encounter.update(2.0, &mut roster, &mut NullSink).unwrap();
        assert_eq!(encounter.attacks().len(), 1);
    }

    #[test]
    fn death_notification_fires_once() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 50, 20, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 10, 1, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        let deaths = Rc::new(Cell::new(0));
        let seen = Rc::clone(&deaths);
        let mut dispatcher = EventDispatcher::new();
        dispatcher.on_death("count", move |ctx| {
            assert_eq!(ctx.target(), UnitId(1));
            seen.set(seen.get() + 1);
            Ok(())
        });

        for _ in 0..10 {
            encounter.update(0.5, &mut roster, &mut dispatcher).unwrap();
        }
        assert_eq!(deaths.get(), 1);
        assert!(!roster.unit(b).unwrap().is_alive());
    }

    #[test]
    fn attack_turned_on_its_source_hurts_the_attacker() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 50, 3, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 50, 7, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        let mut dispatcher = EventDispatcher::new();
        dispatcher.on_attack("mirror", |ctx| {
            let source = ctx.source();
            ctx.redirect(source);
            Ok(())
        });
        encounter.update(0.5, &mut roster, &mut dispatcher).unwrap();

        assert_eq!(encounter.attacks().len(), 1);
        assert_eq!(encounter.attacks()[0].target(), b);
        assert_eq!(roster.unit(b).unwrap().life(), 43);
        assert_eq!(roster.unit(a).unwrap().life(), 50);
        assert_eq!(encounter.cooldowns(), (0.5, 1.0));
        assert!(encounter.is_in_progress());
    }

    #[test]
    fn attack_redirected_to_unknown_unit_is_dropped() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 50, 3, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 50, 7, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        let mut dispatcher = EventDispatcher::new();
        dispatcher.on_attack("lost", |ctx| {
            ctx.redirect(UnitId(99));
            Ok(())
        });
        encounter.update(0.5, &mut roster, &mut dispatcher).unwrap();

        assert_eq!(encounter.attacks().len(), 1);
        assert!(encounter.attacks()[0].is_failed());
        assert_eq!(encounter.attacks()[0].target(), a);
        assert_eq!(roster.unit(a).unwrap().life(), 50);
        assert_eq!(roster.unit(b).unwrap().life(), 50);
        assert!(encounter.is_in_progress());
    }

    #[test]
    fn attack_listener_can_veto() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 10, 5, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 10, 5, 1.0);
        let mut encounter = engaged(&mut roster, a, b);

        let mut dispatcher = EventDispatcher::new();
        dispatcher.on_attack("pacifist", |ctx| {
            ctx.set_fail(true);
            Ok(())
        });
        for _ in 0..20 {
            encounter.update(0.5, &mut roster, &mut dispatcher).unwrap();
        }
        assert_eq!(encounter.cause(), Some(DisengageCause::RoundCap));
        assert_eq!(roster.unit(a).unwrap().life(), 10);
        assert_eq!(roster.unit(b).unwrap().life(), 10);
    }

    #[test]
    fn dead_participant_ends_encounter_without_attacking() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, Faction::Monster, 10, 5, 1.0);
        let b = spawn(&mut roster, Faction::Hero, 10, 5, 1.0);
        let mut encounter = engaged(&mut roster, a, b);
        roster.unit_mut(b).unwrap().damage(10);

        encounter.update(5.0, &mut roster, &mut NullSink).unwrap();
        assert!(encounter.attacks().is_empty());
        assert_eq!(encounter.cause(), Some(DisengageCause::Death));
    }
}
