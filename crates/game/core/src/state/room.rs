use super::unit::UnitId;
use crate::error::CombatError;

/// A room garrisoned by monsters. Heroes that arrive are paired against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleRoom {
    capacity: usize,
    garrison: Vec<UnitId>,
}

impl BattleRoom {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            garrison: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Garrisoned monsters, in deployment order.
    pub fn garrison(&self) -> &[UnitId] {
        &self.garrison
    }

    pub fn is_full(&self) -> bool {
        self.garrison.len() >= self.capacity
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.garrison.contains(&unit)
    }

    pub fn deploy(&mut self, unit: UnitId) -> Result<(), CombatError> {
        if self.is_full() {
            return Err(CombatError::invalid(
                "BattleRoom::deploy",
                "room is at capacity",
            ));
        }
        if self.contains(unit) {
            return Err(CombatError::invalid(
                "BattleRoom::deploy",
                "unit is already deployed here",
            ));
        }
        self.garrison.push(unit);
        Ok(())
    }
}
