//! Wave driver over a single battle room.
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use lair_core::{
    BattleManager, BattleRoom, CombatConfig, CombatEnv, CombatError, Combatant, EventDispatcher,
    Faction, HeroPool, RandomSource, RandomStream, Roster, UnitId, UnitTemplate,
};
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};

/// Label the session's own listeners subscribe under.
const TALLY_LABEL: &str = "session-tally";

/// Notification counters shared with the dispatcher's listeners.
#[derive(Debug, Default)]
struct Tally {
    attacks: Cell<u32>,
    deaths: Cell<u32>,
}

fn bump(counter: &Cell<u32>) {
    counter.set(counter.get().saturating_add(1));
}

/// How a wave ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveOutcome {
    /// Every hero died and the spawner ran dry.
    Defended,
    /// The whole garrison died while a hero was still standing.
    Overrun,
    /// The tick limit was reached first.
    TimedOut,
}

impl WaveOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Defended => "defended",
            Self::Overrun => "overrun",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for WaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one [`Session::run_wave`] call. Counts cover that wave only.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveReport {
    pub ticks: u64,
    /// Simulated seconds.
    pub elapsed: f64,
    pub heroes_spawned: u32,
    pub heroes_defeated: usize,
    pub monsters_lost: usize,
    /// Attack notifications, vetoed attacks included.
    pub attacks: u32,
    pub deaths: u32,
    pub outcome: WaveOutcome,
}

/// Counter values at wave start.
struct Baseline {
    heroes_dead: usize,
    monsters_dead: usize,
    attacks: u32,
    deaths: u32,
    elapsed: f64,
}

/// One dungeon room under siege.
///
/// The session owns every unit and drives the battle manager one frame at a
/// time. Heroes walk into the room the tick they spawn; any hero left
/// without an opponent, including survivors of a round-capped encounter,
/// tries again on later ticks.
pub struct Session<R: RandomSource = RandomStream> {
    battle: BattleManager<R>,
    roster: Roster,
    room: BattleRoom,
    pool: HeroPool,
    dispatcher: EventDispatcher,
    tally: Rc<Tally>,
    /// Living heroes of the current wave, in spawn order.
    heroes: Vec<UnitId>,
    elapsed: f64,
}

impl<R: RandomSource> Session<R> {
    /// Build a session.
    ///
    /// `templates` is the hero catalogue (other factions are ignored).
    /// `garrison` is deployed into the battle room in order and must contain
    /// only monsters, at most `config.room_capacity` of them.
    pub fn new(
        config: CombatConfig,
        rng: R,
        templates: impl IntoIterator<Item = UnitTemplate>,
        garrison: &[UnitTemplate],
    ) -> Result<Self> {
        let mut room = BattleRoom::new(config.room_capacity);
        if garrison.len() > room.capacity() {
            return Err(RuntimeError::GarrisonOverflow {
                given: garrison.len(),
                capacity: room.capacity(),
            });
        }

        let mut roster = Roster::new();
        for template in garrison {
            if template.faction != Faction::Monster {
                return Err(RuntimeError::NotAMonster(template.name.clone()));
            }
            let id = roster.spawn(template);
            room.deploy(id)?;
        }

        let tally = Rc::new(Tally::default());
        let mut dispatcher = EventDispatcher::new();
        let attacks = Rc::clone(&tally);
        dispatcher.on_attack(TALLY_LABEL, move |_| {
            bump(&attacks.attacks);
            Ok(())
        });
        let deaths = Rc::clone(&tally);
        dispatcher.on_death(TALLY_LABEL, move |_| {
            bump(&deaths.deaths);
            Ok(())
        });

        let pool = HeroPool::new(templates);
        info!(
            target: "lair::session",
            garrison = room.garrison().len(),
            hero_templates = pool.templates().len(),
            round_cap = config.round_cap,
            "Session ready"
        );

        Ok(Self {
            battle: BattleManager::new(config, rng),
            roster,
            room,
            pool,
            dispatcher,
            tally,
            heroes: Vec::new(),
            elapsed: 0.0,
        })
    }

    pub fn battle(&self) -> &BattleManager<R> {
        &self.battle
    }

    pub fn battle_mut(&mut self) -> &mut BattleManager<R> {
        &mut self.battle
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn room(&self) -> &BattleRoom {
        &self.room
    }

    /// Subscribe extra listeners here. They run after the session's own.
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// Simulated seconds since the session was built.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Living heroes that arrived this wave.
    pub fn heroes(&self) -> &[UnitId] {
        &self.heroes
    }

    /// SHA-256 fingerprint of every unit's life and opponent.
    pub fn digest(&self) -> [u8; 32] {
        self.roster.digest()
    }

    /// True if every garrison monster is dead and a hero still stands.
    pub fn is_overrun(&self) -> bool {
        let garrison_alive = self
            .room
            .garrison()
            .iter()
            .any(|&id| self.roster.get(id).is_some_and(|unit| unit.is_alive()));
        !garrison_alive && self.roster.count_living(Faction::Hero) > 0
    }

    /// Start spawning the next wave. Nothing changes if the wave needs
    /// heroes and the pool has none.
    pub fn start_wave(&mut self) -> Result<()> {
        if self.pool.is_empty() && self.battle.spawner().max_heroes() > 0 {
            return Err(CombatError::EmptySpawnPool.into());
        }
        self.battle.start_wave();
        Ok(())
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Returns the hero spawned this frame, if any.
    pub fn tick(&mut self, dt: f64) -> Result<Option<UnitId>> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(RuntimeError::InvalidTick(dt));
        }

        let spawned = {
            let mut env = CombatEnv::new(&mut self.roster, &mut self.pool, &mut self.dispatcher);
            self.battle.update(dt, &mut env)?
        };
        self.elapsed += dt;
        self.heroes.extend(spawned);

        let roster = &self.roster;
        self.heroes
            .retain(|&hero| roster.get(hero).is_some_and(|unit| unit.is_alive()));
        for &hero in &self.heroes {
            if let Some(encounter) = self
                .battle
                .engage_in_room(hero, &self.room, &mut self.roster)?
            {
                debug!(
                    target: "lair::session",
                    hero = %hero,
                    encounter = %encounter,
                    "Hero engaged"
                );
            }
        }

        Ok(spawned)
    }

    /// Run a full wave at a fixed `dt`, stopping after `max_ticks` at most.
    pub fn run_wave(&mut self, dt: f64, max_ticks: u64) -> Result<WaveReport> {
        let baseline = Baseline {
            heroes_dead: self.roster.count_dead(Faction::Hero),
            monsters_dead: self.roster.count_dead(Faction::Monster),
            attacks: self.tally.attacks.get(),
            deaths: self.tally.deaths.get(),
            elapsed: self.elapsed,
        };
        self.heroes.clear();
        self.start_wave()?;
        info!(
            target: "lair::session",
            max_heroes = self.battle.spawner().max_heroes(),
            dt,
            max_ticks,
            "Wave running"
        );

        let mut ticks = 0;
        let outcome = loop {
            if ticks >= max_ticks {
                warn!(
                    target: "lair::session",
                    ticks,
                    encounters = self.battle.encounters().len(),
                    "Tick limit reached before the wave ended"
                );
                break WaveOutcome::TimedOut;
            }
            self.tick(dt)?;
            ticks += 1;

            if !self.battle.is_running() {
                break WaveOutcome::Defended;
            }
            if self.is_overrun() {
                break WaveOutcome::Overrun;
            }
        };

        let report = WaveReport {
            ticks,
            elapsed: self.elapsed - baseline.elapsed,
            heroes_spawned: self.battle.spawner().spawned(),
            heroes_defeated: self.roster.count_dead(Faction::Hero) - baseline.heroes_dead,
            monsters_lost: self.roster.count_dead(Faction::Monster) - baseline.monsters_dead,
            attacks: self.tally.attacks.get() - baseline.attacks,
            deaths: self.tally.deaths.get() - baseline.deaths,
            outcome,
        };
        info!(
            target: "lair::session",
            outcome = %report.outcome,
            ticks = report.ticks,
            heroes_spawned = report.heroes_spawned,
            heroes_defeated = report.heroes_defeated,
            monsters_lost = report.monsters_lost,
            "Wave finished"
        );
        Ok(report)
    }
}
