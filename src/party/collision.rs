//! Collision detection between player boxes

use super::player::{PlayerRecord, Position, Size};

/// Axis-aligned box with a top-left origin; y grows downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Aabb {
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            left: position.x,
            top: position.y,
            right: position.x + size.width,
            bottom: position.y + size.height,
        }
    }

    pub fn of(player: &PlayerRecord) -> Self {
        Self::new(player.position, player.size)
    }

    /// Boxes overlap unless strictly separated on some axis, so touching edges count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.top > other.bottom
            || self.bottom < other.top
            || self.left > other.right
            || self.right < other.left)
    }
}

/// First candidate, in iteration order, that can battle and overlaps `player`
pub fn find_collision<'a, I>(player: &PlayerRecord, candidates: I) -> Option<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let bounds = Aabb::of(player);

    candidates
        .into_iter()
        .filter(|enemy| enemy.id != player.id && enemy.can_battle())
        .find(|enemy| bounds.overlaps(&Aabb::of(enemy)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Pet;
    use crate::party::player::{BattleEnemy, PlayerId};

    fn open_player(id: &str, x: f64, y: f64, w: f64, h: f64) -> PlayerRecord {
        let mut player = PlayerRecord::new(PlayerId::from(id), Pet::new("Pydos"), Position::new(x, y));
        player.size = Size::new(w, h);
        player.battle_enemy = BattleEnemy::Open;
        player
    }

    #[test]
    fn test_overlapping_boxes() {
        let a = Aabb::new(Position::new(0.0, 0.0), Size::new(1.0, 1.0));
        let b = Aabb::new(Position::new(0.5, 0.5), Size::new(1.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Aabb::new(Position::new(0.0, 0.0), Size::new(1.0, 1.0));
        let right = Aabb::new(Position::new(1.0, 0.0), Size::new(1.0, 1.0));
        let below = Aabb::new(Position::new(0.0, 1.0), Size::new(1.0, 1.0));
        assert!(a.overlaps(&right));
        assert!(a.overlaps(&below));
    }

    #[test]
    fn test_separated_boxes() {
        let a = Aabb::new(Position::new(0.0, 0.0), Size::new(1.0, 1.0));
        for (x, y) in [(1.5, 0.0), (-1.5, 0.0), (0.0, 1.5), (0.0, -1.5)] {
            let b = Aabb::new(Position::new(x, y), Size::new(1.0, 1.0));
            assert!(!a.overlaps(&b), "({x}, {y}) should be separated");
        }
    }

    #[test]
    fn test_first_match_wins() {
        let player = open_player("a", 0.0, 0.0, 2.0, 2.0);
        let enemies = vec![
            open_player("far", 10.0, 10.0, 1.0, 1.0),
            open_player("b", 1.0, 1.0, 1.0, 1.0),
            open_player("c", 0.5, 0.5, 1.0, 1.0),
        ];

        let found = find_collision(&player, &enemies).unwrap();
        assert_eq!(found.id, PlayerId::from("b"));
    }

    #[test]
    fn test_ineligible_enemies_are_skipped() {
        let player = open_player("a", 0.0, 0.0, 1.0, 1.0);

        let mut inactive = open_player("inactive", 0.0, 0.0, 1.0, 1.0);
        inactive.is_active = false;
        let mut resting = open_player("resting", 0.0, 0.0, 1.0, 1.0);
        resting.battle_enemy = BattleEnemy::NotEligible;
        let mut busy = open_player("busy", 0.0, 0.0, 1.0, 1.0);
        busy.battle_enemy = BattleEnemy::Paired(PlayerId::from("x"));

        let enemies = vec![inactive, resting, busy];
        assert!(find_collision(&player, &enemies).is_none());
    }
}
