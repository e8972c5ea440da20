//! Unit registry and placement.
//!
//! The session owns one [`Roster`]; everything else refers to units through
//! [`UnitId`] handles so that unit ↔ opponent and room ↔ garrison links never
//! form ownership cycles.
mod room;
mod roster;
mod unit;

pub use room::BattleRoom;
pub use roster::Roster;
pub use unit::{Unit, UnitId, UnitTemplate};
