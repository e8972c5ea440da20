//! Per-unit stat block.

use strum::IntoEnumIterator;

use super::component::{StatComponent, StatKind};
use crate::error::CombatError;

/// The seven stats every combatant carries.
///
/// Typed accessors (`life()`, `attack()`, …) are pure reads of the running
/// value. The `evaluate_*` family folds pending modifiers in first, so the
/// mutation is visible at the call site.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitStats {
    life: StatComponent,
    attack: StatComponent,
    defense: StatComponent,
    dexterity: StatComponent,
    combat: StatComponent,
    attack_count: StatComponent,
    move_speed: StatComponent,
}

impl UnitStats {
    /// Build a block from the three template-specific stats; the rest start
    /// at their neutral defaults.
    pub fn new(life: i32, attack: i32, defense: f64) -> Self {
        Self {
            life: StatComponent::new(StatKind::Life, f64::from(life)),
            attack: StatComponent::new(StatKind::Attack, f64::from(attack)),
            defense: StatComponent::new(StatKind::Defense, defense),
            dexterity: StatComponent::new(StatKind::Dexterity, 1.0),
            combat: StatComponent::new(StatKind::Combat, 1.0),
            attack_count: StatComponent::new(StatKind::AttackCount, 1.0),
            move_speed: StatComponent::new(StatKind::MoveSpeed, 1.0),
        }
    }

    /// Override the base dexterity (attack-speed multiplier).
    #[must_use]
    pub fn with_dexterity(mut self, dexterity: f64) -> Self {
        self.dexterity = StatComponent::new(StatKind::Dexterity, dexterity);
        self
    }

    /// Deep copy rebuilt from base values, as handed to a freshly spawned unit.
    pub fn fresh(&self) -> Self {
        Self {
            life: self.life.fresh(),
            attack: self.attack.fresh(),
            defense: self.defense.fresh(),
            dexterity: self.dexterity.fresh(),
            combat: self.combat.fresh(),
            attack_count: self.attack_count.fresh(),
            move_speed: self.move_speed.fresh(),
        }
    }

    pub fn component(&self, kind: StatKind) -> &StatComponent {
        match kind {
            StatKind::Life => &self.life,
            StatKind::Attack => &self.attack,
            StatKind::Defense => &self.defense,
            StatKind::Dexterity => &self.dexterity,
            StatKind::Combat => &self.combat,
            StatKind::AttackCount => &self.attack_count,
            StatKind::MoveSpeed => &self.move_speed,
        }
    }

    pub fn component_mut(&mut self, kind: StatKind) -> &mut StatComponent {
        match kind {
            StatKind::Life => &mut self.life,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Dexterity => &mut self.dexterity,
            StatKind::Combat => &mut self.combat,
            StatKind::AttackCount => &mut self.attack_count,
            StatKind::MoveSpeed => &mut self.move_speed,
        }
    }

    // ===== pure reads =====

    pub fn life(&self) -> i32 {
        self.life.current() as i32
    }

    pub fn max_life(&self) -> i32 {
        self.life.max() as i32
    }

    pub fn attack(&self) -> i32 {
        self.attack.current() as i32
    }

    pub fn defense(&self) -> f64 {
        self.defense.current()
    }

    pub fn dexterity(&self) -> f64 {
        self.dexterity.current()
    }

    pub fn combat(&self) -> f64 {
        self.combat.current()
    }

    pub fn attack_count(&self) -> i32 {
        self.attack_count.current() as i32
    }

    pub fn move_speed(&self) -> f64 {
        self.move_speed.current()
    }

    pub fn is_alive(&self) -> bool {
        self.life() > 0
    }

    // ===== evaluations (apply pending, then read) =====

    /// Apply pending modifiers on one stat and return its running value.
    pub fn evaluate(&mut self, kind: StatKind) -> f64 {
        self.component_mut(kind).evaluate()
    }

    pub fn evaluate_attack(&mut self) -> i32 {
        self.attack.evaluate() as i32
    }

    pub fn evaluate_dexterity(&mut self) -> f64 {
        self.dexterity.evaluate()
    }

    pub fn evaluate_life(&mut self) -> i32 {
        self.life.evaluate() as i32
    }

    /// Apply pending modifiers on every stat.
    pub fn apply_pending(&mut self) {
        for kind in StatKind::iter() {
            self.component_mut(kind).apply_pending();
        }
    }

    // ===== mutation =====

    /// Lower life, flooring at 0. Bypasses the modifier pipeline.
    pub fn damage(&mut self, amount: i32) {
        self.life.drain(f64::from(amount));
    }

    /// Raise life, capping at max. Bypasses the modifier pipeline.
    pub fn heal(&mut self, amount: i32) {
        self.life.restore(f64::from(amount));
    }

    /// Queue a scalar on the stat named `stat`.
    pub fn scale_stat(&mut self, stat: &str, scalar: f64) -> Result<(), CombatError> {
        let kind = Self::parse_kind(stat)?;
        self.component_mut(kind).scale(scalar)
    }

    /// Queue a flat modifier on the stat named `stat`.
    pub fn increase_stat(&mut self, stat: &str, amount: f64) -> Result<(), CombatError> {
        let kind = Self::parse_kind(stat)?;
        self.component_mut(kind).increase(amount)
    }

    fn parse_kind(stat: &str) -> Result<StatKind, CombatError> {
        stat.parse::<StatKind>()
            .map_err(|_| CombatError::UnknownStat(stat.to_owned()))
    }
}
