//! Attack resolution.
//!
//! # Architecture
//!
//! - **DamagePipeline**: base damage plus scalar/flat modifiers and an
//!   optional override, computed per attack
//! - **AttackContext**: one attack beat; owns a pipeline, exposes the hooks
//!   listeners use to modify, veto or redirect the attack, then executes once
//!
//! Damage is applied straight to the target's life and bypasses its stat
//! modifiers.

pub mod attack;
pub mod damage;

pub use attack::{AttackContext, AttackId};
pub use damage::DamagePipeline;
