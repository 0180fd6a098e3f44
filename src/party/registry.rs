//! In-memory party registry and collision-to-battle pairing

use tracing::{debug, info};

use crate::game::{resolve, Attack, BattleReport, Pet};

use super::collision::find_collision;
use super::player::{BattleEnemy, PlayerId, PlayerRecord, Position, Size};

/// Rejected party operations. Unknown ids are never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartyError {
    #[error("A pet name is required to join the party")]
    EmptyPetName,
}

/// Identifies one armed eviction timer. Re-arming for the same player
/// produces a new generation and invalidates older tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionTicket {
    pub player_id: PlayerId,
    pub generation: u64,
}

/// The party: every connected player in join order.
///
/// All methods take `&self`/`&mut self` and run to completion, so a pairing
/// commit updates both players before any other operation can observe them.
#[derive(Debug, Default)]
pub struct Party {
    players: Vec<PlayerRecord>,
    next_eviction: u64,
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of players currently committed to a battle
    pub fn paired_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.battle_enemy.paired_with().is_some())
            .count()
    }

    /// Add a player with the given pet at `position`
    pub fn join(&mut self, pet_name: &str, position: Position) -> Result<PlayerId, PartyError> {
        if pet_name.is_empty() {
            return Err(PartyError::EmptyPetName);
        }

        let mut id = PlayerId::generate();
        while self.exists(&id) {
            id = PlayerId::generate();
        }

        self.players
            .push(PlayerRecord::new(id.clone(), Pet::new(pet_name), position));

        info!(player_id = %id, pet = pet_name, players = self.players.len(), "Player joined party");
        Ok(id)
    }

    pub fn exists(&self, id: &PlayerId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: &PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn get_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerRecord> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    fn index_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    /// Every other player, in join order. Empty for unknown ids.
    pub fn enemies<'a>(&'a self, id: &'a PlayerId) -> Vec<&'a PlayerRecord> {
        if !self.exists(id) {
            return Vec::new();
        }

        self.players.iter().filter(|p| &p.id != id).collect()
    }

    /// Store a new position (and size, when reported). If the player can
    /// battle, the first overlapping eligible enemy is paired with it.
    /// Returns the newly paired enemy's id.
    pub fn update_position(
        &mut self,
        id: &PlayerId,
        position: Position,
        size: Option<Size>,
    ) -> Option<PlayerId> {
        let Some(player) = self.get_mut(id) else {
            debug!(player_id = %id, "Position update for unknown player");
            return None;
        };

        player.position = position;
        if let Some(size) = size {
            player.size = size;
        }

        let player = self.get(id)?;
        if !player.can_battle() {
            return None;
        }

        let enemy_id = find_collision(player, &self.players)?.id.clone();
        self.pair(id, &enemy_id);

        Some(enemy_id)
    }

    /// The enemy an active player is committed to, if any
    pub fn collided_enemy(&self, id: &PlayerId) -> Option<&PlayerRecord> {
        let player = self.get(id)?;
        if !player.is_active {
            return None;
        }

        self.get(player.battle_enemy.paired_with()?)
    }

    /// The per-frame poll: update the position, then report the committed enemy
    pub fn report_position(
        &mut self,
        id: &PlayerId,
        position: Position,
        size: Option<Size>,
    ) -> Option<&PlayerRecord> {
        self.update_position(id, position, size);
        self.collided_enemy(id)
    }

    fn pair(&mut self, a: &PlayerId, b: &PlayerId) {
        if let Some(player) = self.get_mut(a) {
            player.battle_enemy = BattleEnemy::Paired(b.clone());
        }
        if let Some(enemy) = self.get_mut(b) {
            enemy.battle_enemy = BattleEnemy::Paired(a.clone());
        }

        info!(player_id = %a, enemy_id = %b, "Players paired for battle");
    }

    /// Reset whoever is paired with `id` so no one stays paired with a
    /// player that moved on or left
    fn release_partner(&mut self, id: &PlayerId) {
        let Some(partner_id) = self
            .get(id)
            .and_then(|p| p.battle_enemy.paired_with())
            .cloned()
        else {
            return;
        };

        if let Some(partner) = self.get_mut(&partner_id) {
            if partner.battle_enemy.paired_with() == Some(id) {
                partner.battle_enemy = BattleEnemy::NotEligible;
                debug!(player_id = %partner_id, released_by = %id, "Battle partner released");
            }
        }
    }

    /// Overwrite a player's battle state.
    ///
    /// `Paired(target)` commits both sides, and is ignored when the target
    /// is unknown, is the player itself, or is paired with someone else.
    pub fn set_battle_enemy(&mut self, id: &PlayerId, value: BattleEnemy) {
        if !self.exists(id) {
            debug!(player_id = %id, "Battle enemy update for unknown player");
            return;
        }

        if let BattleEnemy::Paired(target) = &value {
            let target_free = self.get(target).is_some_and(|t| {
                t.battle_enemy
                    .paired_with()
                    .map_or(true, |other| other == id)
            });
            if target == id || !target_free {
                debug!(player_id = %id, requested = %target, "Rejected pairing request");
                return;
            }
        }

        self.release_partner(id);

        match value {
            BattleEnemy::Paired(target) => self.pair(id, &target),
            other => {
                if let Some(player) = self.get_mut(id) {
                    player.battle_enemy = other;
                }
            }
        }
    }

    /// Replace the attack sequence, keeping at most one full attack set
    pub fn set_attack_sequence(&mut self, id: &PlayerId, mut sequence: Vec<Attack>) {
        if let Some(player) = self.get_mut(id) {
            sequence.truncate(player.pet.attack_set_size());
            player.attack_sequence = sequence;
        }
    }

    pub fn attack_sequence(&self, id: &PlayerId) -> Vec<Attack> {
        self.get(id)
            .map(|p| p.attack_sequence.clone())
            .unwrap_or_default()
    }

    /// Mark a player active or inactive. Going inactive arms a new eviction
    /// (superseding any earlier one); going active cancels it.
    pub fn set_active(&mut self, id: &PlayerId, is_active: bool) -> Option<EvictionTicket> {
        self.next_eviction += 1;
        let generation = self.next_eviction;

        let player = self.get_mut(id)?;
        player.is_active = is_active;

        if is_active {
            player.pending_eviction = None;
            return None;
        }

        player.pending_eviction = Some(generation);
        Some(EvictionTicket {
            player_id: id.clone(),
            generation,
        })
    }

    /// Remove the player if `ticket` is still its armed eviction.
    /// Returns whether the player was removed.
    pub fn evict(&mut self, ticket: &EvictionTicket) -> bool {
        let armed = self.get(&ticket.player_id).is_some_and(|p| {
            !p.is_active && p.pending_eviction == Some(ticket.generation)
        });

        if armed {
            self.leave(&ticket.player_id);
        }
        armed
    }

    pub fn add_victory(&mut self, id: &PlayerId) {
        if let Some(player) = self.get_mut(id) {
            player.battle_victories += 1;
        }
    }

    /// Remove a player immediately. Unknown ids are ignored.
    pub fn leave(&mut self, id: &PlayerId) -> Option<PlayerRecord> {
        let index = self.index_of(id)?;
        self.release_partner(id);
        let removed = self.players.remove(index);

        info!(player_id = %id, players = self.players.len(), "Player left party");
        Some(removed)
    }

    /// Resolve the battle between a player and its committed enemy once
    /// both attack sequences are complete
    pub fn battle_report(&self, id: &PlayerId) -> Option<BattleReport> {
        let player = self.get(id)?;
        let enemy = self.get(player.battle_enemy.paired_with()?)?;

        if !player.attack_sequence_completed() || !enemy.attack_sequence_completed() {
            return None;
        }

        Some(resolve(&player.attack_sequence, &enemy.attack_sequence))
    }
}
