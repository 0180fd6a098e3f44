//! Party service - serialized access to the registry and eviction timers

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::game::{Attack, BattleReport};

use super::player::{BattleEnemy, PlayerId, PlayerRecord, Position, Size};
use super::registry::{EvictionTicket, Party, PartyError};

struct PartyState {
    party: Party,
    /// Pending eviction task per player, at most one
    timers: HashMap<PlayerId, (u64, AbortHandle)>,
}

impl PartyState {
    fn cancel_timer(&mut self, id: &PlayerId) {
        if let Some((_, handle)) = self.timers.remove(id) {
            handle.abort();
            debug!(player_id = %id, "Eviction cancelled");
        }
    }
}

/// Shared handle to the party. Every operation holds the lock for its whole
/// duration, which is what makes pairing commits atomic.
#[derive(Clone)]
pub struct PartyService {
    state: Arc<Mutex<PartyState>>,
    eviction_timeout: Duration,
}

impl PartyService {
    pub fn new(eviction_timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(PartyState {
                party: Party::new(),
                timers: HashMap::new(),
            })),
            eviction_timeout,
        }
    }

    pub async fn join(&self, pet_name: &str, position: Position) -> Result<PlayerId, PartyError> {
        self.state.lock().await.party.join(pet_name, position)
    }

    pub async fn exists(&self, id: &PlayerId) -> bool {
        self.state.lock().await.party.exists(id)
    }

    /// Update position and size, returning the enemy the player is committed to
    pub async fn report_position(
        &self,
        id: &PlayerId,
        position: Position,
        size: Option<Size>,
    ) -> Option<PlayerRecord> {
        let mut state = self.state.lock().await;
        state.party.report_position(id, position, size).cloned()
    }

    pub async fn enemies(&self, id: &PlayerId) -> Vec<PlayerRecord> {
        let state = self.state.lock().await;
        state.party.enemies(id).into_iter().cloned().collect()
    }

    pub async fn set_battle_enemy(&self, id: &PlayerId, value: BattleEnemy) {
        self.state.lock().await.party.set_battle_enemy(id, value);
    }

    pub async fn set_attack_sequence(&self, id: &PlayerId, sequence: Vec<Attack>) {
        self.state.lock().await.party.set_attack_sequence(id, sequence);
    }

    pub async fn attack_sequence(&self, id: &PlayerId) -> Vec<Attack> {
        self.state.lock().await.party.attack_sequence(id)
    }

    pub async fn add_victory(&self, id: &PlayerId) {
        self.state.lock().await.party.add_victory(id);
    }

    pub async fn battle_report(&self, id: &PlayerId) -> Option<BattleReport> {
        self.state.lock().await.party.battle_report(id)
    }

    /// Mark a player active or inactive. Inactive players are evicted once
    /// the timeout elapses unless they become active again first.
    pub async fn set_active(&self, id: &PlayerId, is_active: bool) {
        let mut state = self.state.lock().await;
        state.cancel_timer(id);

        let Some(ticket) = state.party.set_active(id, is_active) else {
            return;
        };

        let generation = ticket.generation;
        let handle = self.spawn_eviction(ticket);
        state.timers.insert(id.clone(), (generation, handle));

        info!(
            player_id = %id,
            timeout_secs = self.eviction_timeout.as_secs(),
            "Player inactive, eviction armed"
        );
    }

    fn spawn_eviction(&self, ticket: EvictionTicket) -> AbortHandle {
        let state = self.state.clone();
        let timeout = self.eviction_timeout;

        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;

            let mut state = state.lock().await;
            if state
                .timers
                .get(&ticket.player_id)
                .is_some_and(|(generation, _)| *generation == ticket.generation)
            {
                state.timers.remove(&ticket.player_id);
            }

            if state.party.evict(&ticket) {
                info!(player_id = %ticket.player_id, "Inactive player evicted");
            }
        });

        task.abort_handle()
    }

    /// Remove a player now, cancelling any pending eviction
    pub async fn leave(&self, id: &PlayerId) {
        let mut state = self.state.lock().await;
        state.cancel_timer(id);
        state.party.leave(id);
    }

    /// (players, paired players) for the health endpoint
    pub async fn counts(&self) -> (usize, usize) {
        let state = self.state.lock().await;
        (state.party.len(), state.party.paired_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(15);

    async fn joined(service: &PartyService) -> PlayerId {
        service.join("Tucapalma", Position::default()).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactive_player_is_evicted_after_timeout() {
        let service = PartyService::new(TIMEOUT);
        let d = joined(&service).await;

        service.set_active(&d, false).await;

        tokio::time::sleep(TIMEOUT - Duration::from_millis(1)).await;
        assert!(service.exists(&d).await);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!service.exists(&d).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reactivation_cancels_eviction() {
        let service = PartyService::new(TIMEOUT);
        let c = joined(&service).await;

        service.set_active(&c, false).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        service.set_active(&c, true).await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(service.exists(&c).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_replaces_earlier_timer() {
        let service = PartyService::new(TIMEOUT);
        let id = joined(&service).await;

        service.set_active(&id, false).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        service.set_active(&id, false).await;

        // The first timer would have fired at 15s
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(service.exists(&id).await);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!service.exists(&id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_cancels_eviction() {
        let service = PartyService::new(TIMEOUT);
        let id = joined(&service).await;
        let other = joined(&service).await;

        service.set_active(&id, false).await;
        service.leave(&id).await;
        service.leave(&id).await;
        assert!(!service.exists(&id).await);

        tokio::time::sleep(TIMEOUT * 2).await;
        assert!(service.exists(&other).await);
        assert_eq!(service.counts().await, (1, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicting_paired_player_releases_partner() {
        let service = PartyService::new(TIMEOUT);
        let a = service
            .join("Hipodoge", Position::new(0.0, 0.0))
            .await
            .unwrap();
        let b = service
            .join("Capipepo", Position::new(0.5, 0.5))
            .await
            .unwrap();

        let size = Some(Size::new(1.0, 1.0));
        service.report_position(&b, Position::new(0.5, 0.5), size).await;
        service.set_battle_enemy(&a, BattleEnemy::Open).await;
        service.set_battle_enemy(&b, BattleEnemy::Open).await;

        let enemy = service.report_position(&a, Position::new(0.0, 0.0), size).await;
        assert_eq!(enemy.map(|e| e.id), Some(b.clone()));
        assert_eq!(service.counts().await, (2, 2));

        service.set_active(&b, false).await;
        tokio::time::sleep(TIMEOUT + Duration::from_secs(1)).await;

        assert!(!service.exists(&b).await);
        assert!(service
            .report_position(&a, Position::new(0.0, 0.0), size)
            .await
            .is_none());
        assert_eq!(service.counts().await, (1, 0));
    }

    #[tokio::test]
    async fn test_report_position_pairs_players() {
        let service = PartyService::new(TIMEOUT);
        let a = service
            .join("Hipodoge", Position::new(0.0, 0.0))
            .await
            .unwrap();
        let b = service
            .join("Capipepo", Position::new(0.5, 0.5))
            .await
            .unwrap();

        let size = Some(Size::new(1.0, 1.0));
        service.report_position(&b, Position::new(0.5, 0.5), size).await;
        service.set_battle_enemy(&a, BattleEnemy::Open).await;
        service.set_battle_enemy(&b, BattleEnemy::Open).await;

        let enemy = service
            .report_position(&a, Position::new(0.0, 0.0), size)
            .await
            .unwrap();
        assert_eq!(enemy.id, b);
        assert_eq!(enemy.battle_enemy, BattleEnemy::Paired(a.clone()));

        let enemy = service.report_position(&b, Position::new(0.5, 0.5), size).await;
        assert_eq!(enemy.map(|e| e.id), Some(a));
        assert_eq!(service.counts().await, (2, 2));
    }
}
