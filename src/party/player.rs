//! Player records held by the party registry

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Attack, Pet};

/// Opaque player identifier, stable for the lifetime of a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-left corner of a player's box, in map units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Box dimensions reported by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Battle eligibility and pairing of a player.
///
/// On the wire this keeps the browser client's encoding: `"-1"` for
/// [`BattleEnemy::NotEligible`], `""` for [`BattleEnemy::Open`] and the
/// enemy's id for [`BattleEnemy::Paired`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BattleEnemy {
    /// Not ready to fight (freshly joined or between battles)
    #[default]
    NotEligible,
    /// Ready to fight and unpaired
    Open,
    /// Committed to a battle against the given player
    Paired(PlayerId),
}

const NOT_ELIGIBLE_TAG: &str = "-1";

impl BattleEnemy {
    pub fn is_open(&self) -> bool {
        matches!(self, BattleEnemy::Open)
    }

    pub fn paired_with(&self) -> Option<&PlayerId> {
        match self {
            BattleEnemy::Paired(id) => Some(id),
            _ => None,
        }
    }
}

impl From<String> for BattleEnemy {
    fn from(value: String) -> Self {
        match value.as_str() {
            NOT_ELIGIBLE_TAG => BattleEnemy::NotEligible,
            "" => BattleEnemy::Open,
            _ => BattleEnemy::Paired(PlayerId(value)),
        }
    }
}

impl From<BattleEnemy> for String {
    fn from(value: BattleEnemy) -> Self {
        match value {
            BattleEnemy::NotEligible => NOT_ELIGIBLE_TAG.to_string(),
            BattleEnemy::Open => String::new(),
            BattleEnemy::Paired(id) => id.0,
        }
    }
}

/// Authoritative per-player state
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub pet: Pet,
    pub position: Position,
    pub size: Size,
    pub is_active: bool,
    pub battle_enemy: BattleEnemy,
    pub attack_sequence: Vec<Attack>,
    pub battle_victories: u32,
    /// Generation of the currently armed eviction timer, if any
    pub(crate) pending_eviction: Option<u64>,
}

impl PlayerRecord {
    pub fn new(id: PlayerId, pet: Pet, position: Position) -> Self {
        Self {
            id,
            pet,
            position,
            size: Size::default(),
            is_active: true,
            battle_enemy: BattleEnemy::NotEligible,
            attack_sequence: Vec::new(),
            battle_victories: 0,
            pending_eviction: None,
        }
    }

    /// Whether this player may be newly paired with someone
    pub fn can_battle(&self) -> bool {
        self.is_active && self.battle_enemy.is_open()
    }

    /// Whether the attack sequence holds a full attack set
    pub fn attack_sequence_completed(&self) -> bool {
        self.attack_sequence.len() == self.pet.attack_set_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_enemy_wire_encoding() {
        let not_eligible: BattleEnemy = serde_json::from_str(r#""-1""#).unwrap();
        let open: BattleEnemy = serde_json::from_str(r#""""#).unwrap();
        let paired: BattleEnemy = serde_json::from_str(r#""abc""#).unwrap();

        assert_eq!(not_eligible, BattleEnemy::NotEligible);
        assert_eq!(open, BattleEnemy::Open);
        assert_eq!(paired, BattleEnemy::Paired(PlayerId::from("abc")));

        assert_eq!(serde_json::to_string(&BattleEnemy::NotEligible).unwrap(), r#""-1""#);
        assert_eq!(serde_json::to_string(&BattleEnemy::Open).unwrap(), r#""""#);
    }

    #[test]
    fn test_new_record_is_not_eligible() {
        let record = PlayerRecord::new(
            PlayerId::generate(),
            Pet::new("Hipodoge"),
            Position::new(1.0, 2.0),
        );

        assert!(record.is_active);
        assert_eq!(record.battle_enemy, BattleEnemy::NotEligible);
        assert!(!record.can_battle());
        assert_eq!(record.size, Size::default());
        assert_eq!(record.battle_victories, 0);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(PlayerId::generate(), PlayerId::generate());
    }
}
