//! Stat system: per-unit modifiable attributes.
//!
//! ```text
//! [ StatComponent ]  base, running value, pending scalar/flat
//!      ↓
//! [ UnitStats ]      life, attack, defense, dexterity, combat,
//!                    attack_count, move_speed
//! ```
//!
//! ## Principles
//!
//! 1. **One-shot modifiers**: `scale`/`increase` accumulate until the next
//!    evaluation, are folded into the running value, then reset
//! 2. **Explicit evaluation**: reads never mutate; `apply_pending`/`evaluate`
//!    do, and say so at the call site
//! 3. **Life bypass**: damage and healing skip the modifier pipeline and clamp
//!    to `[0, max]`

pub mod block;
pub mod component;

pub use block::UnitStats;
pub use component::{StatComponent, StatKind};
