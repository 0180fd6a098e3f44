//! Request and response bodies for the party endpoints
//! Field names follow the browser client's camelCase JSON

use serde::{Deserialize, Serialize};

use crate::game::{Attack, BattleReport, Pet};
use crate::party::{BattleEnemy, PlayerId, PlayerRecord, Position, Size};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Name of the chosen pet; empty means the join is rejected
    #[serde(default)]
    pub mokepon: String,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    #[serde(default)]
    pub position: Option<Position>,
    /// Previously reported size is kept when absent
    #[serde(default)]
    pub size: Option<Size>,
}

/// Public view of a player, as seen by other players
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub mokepon: Pet,
    pub position: Position,
    pub size: Size,
    pub is_active: bool,
    pub battle_enemy: BattleEnemy,
    pub battle_victories: u32,
}

impl From<PlayerRecord> for PlayerView {
    fn from(p: PlayerRecord) -> Self {
        Self {
            id: p.id,
            mokepon: p.pet,
            position: p.position,
            size: p.size,
            is_active: p.is_active,
            battle_enemy: p.battle_enemy,
            battle_victories: p.battle_victories,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub collided_enemy: Option<PlayerView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemiesResponse {
    pub enemies_data: Vec<PlayerView>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleEnemyRequest {
    /// Missing or null means ready to fight
    #[serde(default)]
    pub battle_enemy: Option<BattleEnemy>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackSequenceBody {
    #[serde(default)]
    pub attack_sequence: Vec<Attack>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsActiveRequest {
    /// Missing flag leaves the player untouched
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistResponse {
    pub player_exist: bool,
}

#[derive(Debug, Serialize)]
pub struct BattleResultResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BattleReport>,
}
