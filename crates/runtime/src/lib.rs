//! Session orchestration for the combat core.
//!
//! This crate wires `lair-core` and `lair-content` together:
//! - [`RuntimeConfig`]: seed, tick length and data paths, from the environment
//! - [`Session`]: owns the roster, the battle manager, the notification
//!   dispatcher and the battle room, and drives waves tick by tick
//! - [`WaveReport`]: what a wave cost both sides
//!
//! The runtime is single-threaded. Everything a tick touches is owned by the
//! session and borrowed into [`lair_core::CombatEnv`] for the duration of one
//! [`lair_core::BattleManager::update`] call.
mod config;
mod error;
mod session;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use session::{Session, WaveOutcome, WaveReport};
