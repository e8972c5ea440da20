//! Unified error types surfaced by the runtime.
//!
//! Wraps combat-core failures and content loading failures so the binary can
//! bubble them up with consistent context.
use lair_core::CombatError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("failed to load {what}")]
    Load {
        what: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("garrison unit '{0}' is not a monster")]
    NotAMonster(String),

    #[error("garrison of {given} units does not fit a room of {capacity}")]
    GarrisonOverflow { given: usize, capacity: usize },

    #[error("tick length must be positive and finite (got {0})")]
    InvalidTick(f64),
}

impl RuntimeError {
    pub(crate) fn load(what: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Load { what, source }
    }
}
