//! Data-driven content definitions and loaders.
//!
//! This crate houses static combat content and provides loaders for RON/TOML
//! data files:
//! - Unit templates, heroes and monsters (data-driven via RON)
//! - Combat configuration (data-driven via TOML)
//!
//! Content feeds the runtime session and never appears in combat state.
//!
//! All loaders use lair-core types directly with serde for RON/TOML
//! deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{Catalogue, ConfigLoader, LoadResult, TemplateLoader};

/// The built-in unit catalogue, in RON.
pub const BUILTIN_UNITS: &str = include_str!("../data/units.ron");

/// The built-in combat tuning, in TOML.
pub const BUILTIN_COMBAT: &str = include_str!("../data/combat.toml");
