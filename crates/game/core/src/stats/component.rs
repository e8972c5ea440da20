//! Single modifiable stat with one-shot modifier accumulation.
//!
//! Formula applied on evaluation: `current = (current × scalar) + flat`
//!
//! Modifiers are consumed, not persistent: after they are applied the
//! accumulators return to their neutral values (`scalar = 1.0`, `flat = 0`).
//! Reading a stat again without queuing new modifiers leaves it unchanged.

use crate::error::CombatError;

/// Identifies one of the seven stats every unit carries.
///
/// Parsed from the names used by `scale_stat`; a few legacy aliases are
/// accepted (`dex`, `num_attacks`, `speed`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    #[strum(to_string = "life")]
    Life,
    #[strum(to_string = "attack")]
    Attack,
    #[strum(to_string = "defense")]
    Defense,
    #[strum(to_string = "dexterity", serialize = "dex")]
    Dexterity,
    #[strum(to_string = "combat")]
    Combat,
    #[strum(to_string = "attack_count", serialize = "num_attacks")]
    AttackCount,
    #[strum(to_string = "move_speed", serialize = "speed")]
    MoveSpeed,
}

/// One stat: immutable base, running value and pending modifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct StatComponent {
    kind: StatKind,
    base: f64,
    current: f64,
    /// Ceiling for `heal`; only meaningful for [`StatKind::Life`].
    max: f64,
    scalar: f64,
    flat: i64,
}

impl StatComponent {
    pub fn new(kind: StatKind, base: f64) -> Self {
        Self {
            kind,
            base,
            current: base,
            max: base,
            scalar: 1.0,
            flat: 0,
        }
    }

    /// A fresh component built from this one's base value.
    ///
    /// This is what a unit spawned from a template receives: no running value,
    /// no pending modifiers, nothing shared with the original.
    pub fn fresh(&self) -> Self {
        Self::new(self.kind, self.base)
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Running value as of the last evaluation. Does not apply pending modifiers.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Pending `(scalar, flat)` accumulators.
    pub fn pending(&self) -> (f64, i64) {
        (self.scalar, self.flat)
    }

    pub fn has_pending(&self) -> bool {
        self.scalar != 1.0 || self.flat != 0
    }

    /// Queue a multiplicative modifier. Scalars add up: `scale(2.0)` turns the
    /// neutral 1.0 into 3.0.
    pub fn scale(&mut self, scalar: f64) -> Result<(), CombatError> {
        if !scalar.is_finite() {
            return Err(CombatError::invalid(
                "StatComponent::scale",
                "scalar must be a finite number",
            ));
        }
        self.scalar += scalar;
        Ok(())
    }

    /// Queue a flat modifier. Fractional amounts truncate toward zero and the
    /// accumulator saturates at the `i64` bounds.
    pub fn increase(&mut self, amount: f64) -> Result<(), CombatError> {
        if !amount.is_finite() {
            return Err(CombatError::invalid(
                "StatComponent::increase",
                "amount must be a finite number",
            ));
        }
        self.flat = self.flat.saturating_add(amount.trunc() as i64);
        Ok(())
    }

    /// Fold pending modifiers into the running value and reset them.
    pub fn apply_pending(&mut self) {
        self.current = (self.current * self.scalar) + self.flat as f64;
        self.reset();
    }

    /// `apply_pending` followed by `current`.
    pub fn evaluate(&mut self) -> f64 {
        self.apply_pending();
        self.current
    }

    /// Drop pending modifiers without applying them.
    pub fn reset(&mut self) {
        self.scalar = 1.0;
        self.flat = 0;
    }

    /// Lower the running value, flooring at 0. Life only.
    pub fn damage(&mut self, amount: f64) -> Result<(), CombatError> {
        self.require_life("StatComponent::damage")?;
        self.drain(amount);
        Ok(())
    }

    /// Raise the running value, capping at max. Life only.
    pub fn heal(&mut self, amount: f64) -> Result<(), CombatError> {
        self.require_life("StatComponent::heal")?;
        self.restore(amount);
        Ok(())
    }

    pub(crate) fn drain(&mut self, amount: f64) {
        self.current = (self.current - amount).clamp(0.0, self.max.max(0.0));
    }

    pub(crate) fn restore(&mut self, amount: f64) {
        self.current = (self.current + amount).clamp(0.0, self.max.max(0.0));
    }

    fn require_life(&self, context: &'static str) -> Result<(), CombatError> {
        if self.kind != StatKind::Life {
            return Err(CombatError::invalid(
                context,
                "only the life stat can be damaged or healed",
            ));
        }
        Ok(())
    }
}
