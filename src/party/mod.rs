//! Party registry: connected players, collision pairing and liveness

pub mod collision;
pub mod player;
pub mod registry;
pub mod service;

pub use player::{BattleEnemy, PlayerId, PlayerRecord, Position, Size};
pub use registry::PartyError;
pub use service::PartyService;
