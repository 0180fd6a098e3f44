//! Battle resolution - element-wise comparison of two attack sequences

use serde::Serialize;

use super::pets::Attack;

/// Result of a single round, from the requesting player's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Tie,
    Lose,
}

/// Overall battle result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Draw,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReport {
    pub rounds: Vec<RoundOutcome>,
    pub wins: u32,
    pub enemy_wins: u32,
    pub outcome: BattleOutcome,
}

/// Compare one attack against the opponent's attack in the same slot
pub fn resolve_round(own: &Attack, enemy: &Attack) -> RoundOutcome {
    if own.element == enemy.element {
        RoundOutcome::Tie
    } else if own.element.beats(enemy.element) {
        RoundOutcome::Win
    } else {
        RoundOutcome::Lose
    }
}

/// Resolve a battle round by round. Extra attacks in the longer sequence are ignored.
pub fn resolve(own: &[Attack], enemy: &[Attack]) -> BattleReport {
    let rounds: Vec<RoundOutcome> = own
        .iter()
        .zip(enemy)
        .map(|(a, b)| resolve_round(a, b))
        .collect();

    let wins = rounds.iter().filter(|r| **r == RoundOutcome::Win).count() as u32;
    let enemy_wins = rounds.iter().filter(|r| **r == RoundOutcome::Lose).count() as u32;

    let outcome = match wins.cmp(&enemy_wins) {
        std::cmp::Ordering::Greater => BattleOutcome::Victory,
        std::cmp::Ordering::Equal => BattleOutcome::Draw,
        std::cmp::Ordering::Less => BattleOutcome::Defeat,
    };

    BattleReport {
        rounds,
        wins,
        enemy_wins,
        outcome,
    }
}
