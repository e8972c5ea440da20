//! Hero supply for the spawner.

use std::collections::BTreeMap;

use tracing::debug;

use super::rng::{RandomExt, RandomSource};
use crate::error::CombatError;
use crate::state::{Roster, UnitId, UnitTemplate};
use crate::traits::Faction;

/// Produces heroes on request.
///
/// The RNG is passed in rather than owned so every draw comes from the one
/// stream the battle manager owns.
pub trait SpawnPool {
    fn spawn_hero(
        &mut self,
        rng: &mut dyn RandomSource,
        roster: &mut Roster,
    ) -> Result<UnitId, CombatError>;
}

/// Spawn pool over a hero catalogue, weighted by star rank.
///
/// By default a rank-`r` template weighs `1 / r`, so one-star heroes are the
/// most common.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroPool {
    templates: Vec<UnitTemplate>,
    weights_by_rank: BTreeMap<u8, f64>,
}

impl HeroPool {
    /// Build from a catalogue. Non-hero templates are ignored.
    pub fn new(templates: impl IntoIterator<Item = UnitTemplate>) -> Self {
        let templates: Vec<UnitTemplate> = templates
            .into_iter()
            .filter(|template| template.faction == Faction::Hero)
            .collect();
        let weights_by_rank = templates
            .iter()
            .map(|template| (template.rank, 1.0 / f64::from(template.rank.max(1))))
            .collect();
        Self {
            templates,
            weights_by_rank,
        }
    }

    #[must_use]
    pub fn with_rank_weights(mut self, weights_by_rank: BTreeMap<u8, f64>) -> Self {
        self.weights_by_rank = weights_by_rank;
        self
    }

    pub fn templates(&self) -> &[UnitTemplate] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl SpawnPool for HeroPool {
    fn spawn_hero(
        &mut self,
        rng: &mut dyn RandomSource,
        roster: &mut Roster,
    ) -> Result<UnitId, CombatError> {
        if self.templates.is_empty() {
            return Err(CombatError::EmptySpawnPool);
        }
        let picks = rng.weighted_choice(&self.templates, &self.weights_by_rank, 1)?;
        let template = picks.first().ok_or(CombatError::EmptySpawnPool)?;
        let id = roster.spawn(template);
        debug!(
            target: "lair::spawn",
            hero = %id,
            name = %template.name,
            rank = template.rank,
            "Hero spawned"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedSequence;

    fn catalogue() -> Vec<UnitTemplate> {
        vec![
            UnitTemplate::new("Villager", Faction::Hero, 1, 10, 2, 0.0),
            UnitTemplate::new("Goblin", Faction::Monster, 1, 10, 2, 0.0),
            UnitTemplate::new("Knight", Faction::Hero, 2, 30, 5, 2.0),
        ]
    }

    #[test]
    fn monsters_are_filtered_out() {
        let pool = HeroPool::new(catalogue());
        assert_eq!(pool.templates().len(), 2);
        assert!(pool.templates().iter().all(|t| t.faction == Faction::Hero));
    }

    #[test]
    fn spawn_uses_rank_weights() {
        // Weights 1.0 and 0.5 normalize to 2/3 and 1/3.
        let mut pool = HeroPool::new(catalogue());
        let mut rng = FixedSequence::new([0.1, 0.9]);
        let mut roster = Roster::new();

        let first = pool.spawn_hero(&mut rng, &mut roster).unwrap();
        let second = pool.spawn_hero(&mut rng, &mut roster).unwrap();
        assert_eq!(roster.unit(first).unwrap().name(), "Villager");
        assert_eq!(roster.unit(second).unwrap().name(), "Knight");
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn explicit_weights_override_defaults() {
        let weights = BTreeMap::from([(2, 1.0)]);
        let mut pool = HeroPool::new(catalogue()).with_rank_weights(weights);
        let mut rng = FixedSequence::new([0.0]);
        let mut roster = Roster::new();

        let id = pool.spawn_hero(&mut rng, &mut roster).unwrap();
        assert_eq!(roster.unit(id).unwrap().name(), "Knight");
    }

    #[test]
    fn empty_pool_is_fatal() {
        let mut pool = HeroPool::new(Vec::new());
        let mut rng = FixedSequence::new([0.5]);
        let mut roster = Roster::new();
        assert_eq!(
            pool.spawn_hero(&mut rng, &mut roster),
            Err(CombatError::EmptySpawnPool)
        );
        assert!(roster.is_empty());
    }
}
