//! In-memory player store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::PlayerStore;
use crate::models::{Player, PlayerId, PlayerPatch};

/// Player store kept in process memory, reset on restart.
///
/// Every operation holds the lock for its whole duration, so id generation
/// and insertion happen under one write guard.
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    players: RwLock<BTreeMap<PlayerId, Player>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from preloaded players.
    pub async fn with_players(players: Vec<Player>) -> Self {
        let store = Self::new();
        store.insert_all(players).await;
        store
    }

    /// Bulk insert, assigning ids to players that have none.
    pub async fn insert_all(&self, players: Vec<Player>) -> usize {
        let mut map = self.players.write().await;
        let count = players.len();
        for mut player in players {
            let id = match player.id {
                Some(id) => id,
                None => {
                    let id = next_id(&map);
                    player.id = Some(id);
                    id
                }
            };
            map.insert(id, player);
        }
        info!("Loaded {} players into store ({} total)", count, map.len());
        count
    }
}

fn next_id(map: &BTreeMap<PlayerId, Player>) -> PlayerId {
    map.keys().next_back().map(|id| id + 1).unwrap_or(1)
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn find_all(&self) -> Vec<Player> {
        let map = self.players.read().await;
        debug!("Reading {} players", map.len());
        map.values().cloned().collect()
    }

    async fn find_by_id(&self, id: PlayerId) -> Option<Player> {
        self.players.read().await.get(&id).cloned()
    }

    async fn save(&self, player: &mut Player) {
        let mut map = self.players.write().await;
        let id = match player.id {
            Some(id) => id,
            None => {
                let id = next_id(&map);
                player.id = Some(id);
                id
            }
        };
        map.insert(id, player.clone());
        info!("Saved player {}: {}", id, player.full_name());
    }

    async fn update(&self, id: PlayerId, patch: PlayerPatch) -> Option<Player> {
        let mut map = self.players.write().await;
        let player = map.get_mut(&id)?;
        patch.apply_to(player);
        info!("Updated player {}: {}", id, player.full_name());
        Some(player.clone())
    }

    async fn delete_by_id(&self, id: PlayerId) {
        if let Some(removed) = self.players.write().await.remove(&id) {
            info!("Deleted player {}: {}", id, removed.full_name());
        }
    }

    async fn len(&self) -> usize {
        self.players.read().await.len()
    }
}
