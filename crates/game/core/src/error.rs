//! Common error infrastructure for lair-core.
//!
//! Every failure the combat core can raise is an internal-consistency guard:
//! callers pass malformed arguments, point at units that do not exist, or hand
//! the RNG an invalid distribution. None of them are expected during a normal
//! tick, so the combat loop propagates them instead of recovering.
//!
//! Listener failures are the exception. They are represented by
//! [`ListenerError`], caught inside the dispatcher and logged per listener.

use crate::state::UnitId;

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: non-finite scalar, unknown stat name, malformed weights.
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: a unit handle that does not resolve in the roster.
    Internal,

    /// The session cannot continue.
    ///
    /// Examples: the spawn pool has nothing to spawn.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all lair-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by the stat, damage, RNG and encounter layers.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    /// An argument had the right type but an unusable value.
    #[error("invalid argument passed to {context}: {reason}")]
    InvalidArgument {
        context: &'static str,
        reason: &'static str,
    },

    /// `scale_stat` was given a name that matches no stat.
    #[error("invalid stat: {0}")]
    UnknownStat(String),

    /// A required argument was neither supplied nor derivable.
    #[error("'{argument}' was not passed to {context}")]
    MissingArgument {
        context: &'static str,
        argument: &'static str,
    },

    /// Weighted selection received an unusable distribution.
    #[error("invalid weight distribution: {0}")]
    InvalidDistribution(&'static str),

    /// `chance` was asked for a probability outside `[0, 100]`.
    #[error("chance must be between 0 and 100 (got {0})")]
    ChanceOutOfRange(f64),

    /// A unit handle does not resolve in the roster.
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    /// The spawn pool has no hero templates to draw from.
    #[error("spawn pool has no hero templates")]
    EmptySpawnPool,
}

impl CombatError {
    pub(crate) const fn invalid(context: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { context, reason }
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidArgument { .. }
            | Self::UnknownStat(_)
            | Self::MissingArgument { .. }
            | Self::InvalidDistribution(_)
            | Self::ChanceOutOfRange(_) => ErrorSeverity::Validation,
            Self::UnitNotFound(_) => ErrorSeverity::Internal,
            Self::EmptySpawnPool => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::UnknownStat(_) => "UNKNOWN_STAT",
            Self::MissingArgument { .. } => "MISSING_ARGUMENT",
            Self::InvalidDistribution(_) => "INVALID_DISTRIBUTION",
            Self::ChanceOutOfRange(_) => "CHANCE_OUT_OF_RANGE",
            Self::UnitNotFound(_) => "UNIT_NOT_FOUND",
            Self::EmptySpawnPool => "EMPTY_SPAWN_POOL",
        }
    }
}

/// Failure reported by a notification listener.
///
/// The dispatcher logs these and moves on to the next listener; they never
/// reach the combat tick.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
