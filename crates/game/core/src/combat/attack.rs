//! A single attack beat.

use std::fmt;

use super::damage::DamagePipeline;
use crate::engine::EncounterId;
use crate::error::CombatError;
use crate::state::{Roster, UnitId};
use crate::traits::Combatant;

/// Identifies one attack: the encounter that issued it and its position in
/// that encounter's log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttackId {
    pub encounter: EncounterId,
    pub seq: u32,
}

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.encounter, self.seq)
    }
}

/// One attack from `source` against `target`.
///
/// Built by an encounter, handed to attack listeners for modification, then
/// executed exactly once. Listeners may scale or adjust the damage, pin it
/// with an override, veto the attack with [`set_fail`](Self::set_fail) or
/// point it at someone else with [`redirect`](Self::redirect).
#[derive(Clone, Debug)]
pub struct AttackContext {
    id: AttackId,
    source: UnitId,
    target: UnitId,
    pipeline: DamagePipeline,
    fail: bool,
    executed: bool,
}

impl AttackContext {
    /// Seed the damage pipeline from the attacker's current attack stat.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::MissingArgument`] if the attacker has no attack
    /// stat; use [`with_base_damage`](Self::with_base_damage) for those.
    pub fn new(
        id: AttackId,
        attacker: &mut dyn Combatant,
        target: UnitId,
    ) -> Result<Self, CombatError> {
        let base = attacker.attack().ok_or(CombatError::MissingArgument {
            context: "AttackContext::new",
            argument: "base_damage",
        })?;
        Ok(Self::with_base_damage(id, attacker.id(), target, base))
    }

    pub fn with_base_damage(id: AttackId, source: UnitId, target: UnitId, base: i32) -> Self {
        Self {
            id,
            source,
            target,
            pipeline: DamagePipeline::new(base),
            fail: false,
            executed: false,
        }
    }

    pub fn id(&self) -> AttackId {
        self.id
    }

    pub fn source(&self) -> UnitId {
        self.source
    }

    pub fn target(&self) -> UnitId {
        self.target
    }

    pub fn is_failed(&self) -> bool {
        self.fail
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn scale_damage(&mut self, scalar: f64) -> Result<(), CombatError> {
        self.pipeline.scale_damage(scalar)
    }

    pub fn increase_damage_flat(&mut self, amount: f64) -> Result<(), CombatError> {
        self.pipeline.increase_damage(amount)
    }

    pub fn reduce_damage_flat(&mut self, amount: f64) -> Result<(), CombatError> {
        self.pipeline.reduce_damage(amount)
    }

    pub fn override_damage(&mut self, amount: i32) {
        self.pipeline.override_damage(amount);
    }

    /// Final damage, or 0 if the attack is marked to fail.
    pub fn damage(&mut self) -> i32 {
        if self.fail {
            return 0;
        }
        self.pipeline.calculate()
    }

    /// True if the attack is vetoed or would deal no damage.
    pub fn will_fail(&mut self) -> bool {
        self.fail || self.damage() <= 0
    }

    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    /// Whether the current damage would bring `unit` to zero, counting its
    /// defense as extra life. Pending modifiers are previewed, not consumed.
    pub fn would_kill(&self, unit: &dyn Combatant) -> bool {
        let damage = self.preview_damage();
        if damage == 0 {
            return false;
        }
        f64::from(unit.life()) + unit.defense() - f64::from(damage) <= 0.0
    }

    /// [`would_kill`](Self::would_kill) against the unit this attack is
    /// currently aimed at.
    pub fn would_kill_target(&self, roster: &Roster) -> Result<bool, CombatError> {
        Ok(self.would_kill(roster.unit(self.target)?))
    }

    pub fn redirect(&mut self, new_target: UnitId) {
        self.target = new_target;
    }

    /// Apply the attack. Runs at most once; later calls return 0.
    ///
    /// `source` and `target` must be the units this context currently names.
    pub fn execute(
        &mut self,
        source: &mut dyn Combatant,
        target: &mut dyn Combatant,
    ) -> Result<i32, CombatError> {
        if source.id() != self.source {
            return Err(CombatError::invalid(
                "AttackContext::execute",
                "source does not match the attacking unit",
            ));
        }
        if target.id() != self.target {
            return Err(CombatError::invalid(
                "AttackContext::execute",
                "target does not match the attacked unit",
            ));
        }
        let Some(damage) = self.commit() else {
            return Ok(0);
        };
        source.play_attack_animation();
        target.damage(damage);
        Ok(damage)
    }

    /// Apply an attack that was redirected onto its own source.
    pub fn execute_on_source(&mut self, unit: &mut dyn Combatant) -> Result<i32, CombatError> {
        if unit.id() != self.source || self.target != self.source {
            return Err(CombatError::invalid(
                "AttackContext::execute_on_source",
                "attack is not aimed at its own source",
            ));
        }
        let Some(damage) = self.commit() else {
            return Ok(0);
        };
        unit.play_attack_animation();
        unit.damage(damage);
        Ok(damage)
    }

    /// Mark the attack executed and return the damage to deal, or `None` if
    /// it already ran or would deal nothing.
    fn commit(&mut self) -> Option<i32> {
        if self.executed {
            return None;
        }
        self.executed = true;
        if self.will_fail() {
            return None;
        }
        Some(self.damage())
    }

    fn preview_damage(&self) -> i32 {
        if self.fail { 0 } else { self.pipeline.preview() }
    }
}

impl PartialEq for AttackContext {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AttackContext {}

impl fmt::Display for AttackContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attack {}: {} -> {} for {}",
            self.id,
            self.source,
            self.target,
            self.preview_damage()
        )
    }
}
