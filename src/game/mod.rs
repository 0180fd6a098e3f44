//! Battle rules shared by the party registry and the HTTP surface

pub mod battle;
pub mod pets;

pub use battle::{resolve, BattleReport};
pub use pets::{Attack, Pet};
