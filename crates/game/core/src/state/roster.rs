use sha2::{Digest, Sha256};

use super::unit::{Unit, UnitId, UnitTemplate};
use crate::error::CombatError;
use crate::traits::{Combatant, Faction};

/// Central unit registry owned by the session.
///
/// Units are never removed: the dead stay in place so that every [`UnitId`]
/// handed out keeps resolving. Cross-unit links (opponents, room garrisons)
/// are handles into this registry, never owning references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    units: Vec<Unit>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a unit from `template` and return its handle.
    pub fn spawn(&mut self, template: &UnitTemplate) -> UnitId {
        let id = self.next_id();
        self.units.push(Unit::from_template(id, template));
        id
    }

    /// Insert a unit built by `build`, which receives the handle it will own.
    pub fn insert_with(&mut self, build: impl FnOnce(UnitId) -> Unit) -> UnitId {
        let id = self.next_id();
        self.units.push(build(id));
        id
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0 as usize)
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit, CombatError> {
        self.get(id).ok_or(CombatError::UnitNotFound(id))
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit, CombatError> {
        self.get_mut(id).ok_or(CombatError::UnitNotFound(id))
    }

    /// Borrow two distinct units mutably at once.
    pub fn pair_mut(&mut self, a: UnitId, b: UnitId) -> Result<(&mut Unit, &mut Unit), CombatError> {
        let (i, j) = (a.0 as usize, b.0 as usize);
        if i >= self.units.len() {
            return Err(CombatError::UnitNotFound(a));
        }
        if j >= self.units.len() {
            return Err(CombatError::UnitNotFound(b));
        }
        if i == j {
            return Err(CombatError::invalid(
                "Roster::pair_mut",
                "a unit cannot be paired with itself",
            ));
        }

        if i < j {
            let (left, right) = self.units.split_at_mut(j);
            Ok((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.units.split_at_mut(i);
            Ok((&mut right[0], &mut left[j]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |unit| unit.faction() == faction && unit.is_alive())
    }

    pub fn count_living(&self, faction: Faction) -> usize {
        self.living(faction).count()
    }

    pub fn count_dead(&self, faction: Faction) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.faction() == faction && !unit.is_alive())
            .count()
    }

    /// SHA-256 over every unit's handle, life and opponent.
    ///
    /// Two runs with the same seed and inputs must produce the same digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for unit in &self.units {
            hasher.update(unit.id().0.to_le_bytes());
            hasher.update(unit.life().to_le_bytes());
            let opponent = unit.opponent().map_or(u32::MAX, |id| id.0);
            hasher.update(opponent.to_le_bytes());
        }
        hasher.finalize().into()
    }

    fn next_id(&self) -> UnitId {
        UnitId(self.units.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> UnitTemplate {
        UnitTemplate::new("Goblin", Faction::Monster, 1, 10, 2, 0.0)
    }

    fn farmer() -> UnitTemplate {
        UnitTemplate::new("Farmer", Faction::Hero, 1, 6, 1, 0.0)
    }

    #[test]
    fn handles_are_sequential() {
        let mut roster = Roster::new();
        assert_eq!(roster.spawn(&goblin()), UnitId(0));
        assert_eq!(roster.spawn(&farmer()), UnitId(1));
        assert_eq!(roster.len(), 2);
        assert!(roster.get(UnitId(2)).is_none());
        assert_eq!(
            roster.unit(UnitId(7)).unwrap_err(),
            CombatError::UnitNotFound(UnitId(7))
        );
    }

    #[test]
    fn pair_mut_returns_units_in_argument_order() {
        let mut roster = Roster::new();
        let a = roster.spawn(&goblin());
        let b = roster.spawn(&farmer());

        let (first, second) = roster.pair_mut(b, a).unwrap();
        assert_eq!(first.id(), b);
        assert_eq!(second.id(), a);
        second.damage(4);
        assert_eq!(roster.unit(a).unwrap().life(), 6);
    }

    #[test]
    fn pair_mut_rejects_self_pairs() {
        let mut roster = Roster::new();
        let a = roster.spawn(&goblin());
        assert!(matches!(
            roster.pair_mut(a, a),
            Err(CombatError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn living_counts_by_faction() {
        let mut roster = Roster::new();
        roster.spawn(&goblin());
        let hero = roster.spawn(&farmer());
        roster.spawn(&farmer());
        roster.unit_mut(hero).unwrap().damage(100);

        assert_eq!(roster.count_living(Faction::Hero), 1);
        assert_eq!(roster.count_dead(Faction::Hero), 1);
        assert_eq!(roster.count_living(Faction::Monster), 1);
    }

    #[test]
    fn digest_tracks_life_changes() {
        let mut roster = Roster::new();
        let a = roster.spawn(&goblin());
        roster.spawn(&farmer());
        let before = roster.digest();
        assert_eq!(before, roster.clone().digest());

        roster.unit_mut(a).unwrap().damage(1);
        assert_ne!(before, roster.digest());
        assert_eq!(hex::encode(roster.digest()).len(), 64);
    }
}
