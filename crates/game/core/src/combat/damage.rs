//! Per-attack damage computation.

use crate::error::CombatError;

/// Computes a single attack's final damage.
///
/// # Formula
///
/// ```text
/// start  = cached_total or base
/// total  = clamp(trunc(start × scalar) + flat, 0, i32::MAX)
/// ```
///
/// An override, once set, wins over everything else. Without one, each
/// `calculate` compounds on the previous cached total rather than on the
/// original base: `base 10, +5 → 15, +5 → 20`. The scalar and flat
/// accumulators are consumed by the calculation that applies them, so a
/// repeated `calculate` with nothing new queued returns the cached value.
#[derive(Clone, Debug, PartialEq)]
pub struct DamagePipeline {
    base: i32,
    scalar: f64,
    flat: i64,
    override_amount: Option<i32>,
    total: Option<i32>,
}

impl DamagePipeline {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            scalar: 1.0,
            flat: 0,
            override_amount: None,
            total: None,
        }
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    /// Cached result of the last `calculate`, if any.
    pub fn total(&self) -> Option<i32> {
        self.total
    }

    pub fn is_overridden(&self) -> bool {
        self.override_amount.is_some()
    }

    /// Add to the scalar accumulator. `scale_damage(0.5)` means +50%.
    pub fn scale_damage(&mut self, scalar: f64) -> Result<(), CombatError> {
        if !scalar.is_finite() {
            return Err(CombatError::invalid(
                "DamagePipeline::scale_damage",
                "scalar must be a finite number",
            ));
        }
        self.scalar += scalar;
        Ok(())
    }

    /// Add to the flat accumulator. Fractional amounts truncate toward zero;
    /// negative amounts reduce damage. The accumulator saturates.
    pub fn increase_damage(&mut self, amount: f64) -> Result<(), CombatError> {
        if !amount.is_finite() {
            return Err(CombatError::invalid(
                "DamagePipeline::increase_damage",
                "amount must be a finite number",
            ));
        }
        self.flat = self.flat.saturating_add(amount.trunc() as i64);
        Ok(())
    }

    pub fn reduce_damage(&mut self, amount: f64) -> Result<(), CombatError> {
        self.increase_damage(-amount)
    }

    /// Pin the result. Later modifiers are ignored; negative amounts floor at 0.
    pub fn override_damage(&mut self, amount: i32) {
        self.override_amount = Some(amount);
    }

    /// Compute, cache and return the damage.
    pub fn calculate(&mut self) -> i32 {
        let total = self.preview();
        if self.override_amount.is_none() {
            self.scalar = 1.0;
            self.flat = 0;
        }
        self.total = Some(total);
        total
    }

    /// What `calculate` would return, without caching or consuming modifiers.
    pub fn preview(&self) -> i32 {
        if let Some(amount) = self.override_amount {
            return amount.max(0);
        }
        let start = f64::from(self.total.unwrap_or(self.base));
        let value = ((start * self.scalar).trunc() as i64).saturating_add(self.flat);
        value.clamp(0, i64::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_later_modifiers() {
        let mut pipeline = DamagePipeline::new(10);
        pipeline.override_damage(5);
        pipeline.scale_damage(3.0).unwrap();
        pipeline.increase_damage(100.0).unwrap();
        assert_eq!(pipeline.calculate(), 5);
        assert_eq!(pipeline.calculate(), 5);
    }

    #[test]
    fn repeated_calculations_compound_on_cached_total() {
        let mut pipeline = DamagePipeline::new(10);
        pipeline.scale_damage(0.0).unwrap();
        pipeline.increase_damage(5.0).unwrap();
        assert_eq!(pipeline.calculate(), 15);

        pipeline.increase_damage(5.0).unwrap();
        assert_eq!(pipeline.calculate(), 20);
        assert_eq!(pipeline.base(), 10);
    }

    #[test]
    fn calculate_is_stable_without_new_modifiers() {
        let mut pipeline = DamagePipeline::new(8);
        pipeline.scale_damage(0.5).unwrap();
        assert_eq!(pipeline.calculate(), 12);
        assert_eq!(pipeline.calculate(), 12);
        assert_eq!(pipeline.total(), Some(12));
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut pipeline = DamagePipeline::new(4);
        pipeline.reduce_damage(9.0).unwrap();
        assert_eq!(pipeline.calculate(), 0);

        pipeline.increase_damage(3.0).unwrap();
        assert_eq!(pipeline.calculate(), 3);
    }

    #[test]
    fn negative_override_floors_at_zero() {
        let mut pipeline = DamagePipeline::new(10);
        pipeline.override_damage(-5);
        assert_eq!(pipeline.preview(), 0);
        assert_eq!(pipeline.calculate(), 0);
    }

    #[test]
    fn huge_flat_modifiers_saturate() {
        let mut pipeline = DamagePipeline::new(10);
        pipeline.increase_damage(6.0e18).unwrap();
        pipeline.increase_damage(6.0e18).unwrap();
        assert_eq!(pipeline.calculate(), i32::MAX);

        pipeline.reduce_damage(6.0e18).unwrap();
        pipeline.reduce_damage(6.0e18).unwrap();
        assert_eq!(pipeline.calculate(), 0);
    }

    #[test]
    fn preview_does_not_consume() {
        let mut pipeline = DamagePipeline::new(6);
        pipeline.increase_damage(2.7).unwrap();
        assert_eq!(pipeline.preview(), 8);
        assert_eq!(pipeline.total(), None);
        assert_eq!(pipeline.calculate(), 8);
    }

    #[test]
    fn non_finite_modifiers_are_rejected() {
        let mut pipeline = DamagePipeline::new(6);
        assert!(pipeline.scale_damage(f64::INFINITY).is_err());
        assert!(pipeline.increase_damage(f64::NAN).is_err());
        assert_eq!(pipeline.calculate(), 6);
    }
}
