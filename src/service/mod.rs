//! Player use-cases.
//!
//! `PlayerService` composes a [`PlayerStore`] with the statistics engine.
//! Each operation is a single step against the store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::calculate::{self, StatsError};
use crate::models::{Player, PlayerId, PlayerPatch, Statistic};
use crate::storage::PlayerStore;

/// Errors surfaced by the player use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Player {0} not found")]
    NotFound(PlayerId),

    #[error("No statistic available")]
    NoStatisticAvailable,
}

impl From<StatsError> for ServiceError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::NoStatisticAvailable => ServiceError::NoStatisticAvailable,
        }
    }
}

#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    pub async fn player_count(&self) -> usize {
        self.store.len().await
    }

    pub async fn get_all_players(&self) -> Vec<Player> {
        self.store.find_all().await
    }

    pub async fn get_player_by_id(&self, id: PlayerId) -> Option<Player> {
        self.store.find_by_id(id).await
    }

    /// Players with data, ascending by rank. Unranked players come last.
    pub async fn get_players_sorted_by_rank(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .store
            .find_all()
            .await
            .into_iter()
            .filter(Player::has_data)
            .collect();

        // Stable: equal ranks keep store order
        players.sort_by_key(|p| (p.rank().is_none(), p.rank()));
        players
    }

    pub async fn get_country_with_best_win_ratio(&self) -> Result<Statistic, ServiceError> {
        let players = self.store.find_all().await;
        let best = calculate::best_country_by_win_ratio(&players)?;
        debug!(
            "Best country {} with win ratio {:.2}",
            best.country_code, best.win_ratio
        );
        Ok(best)
    }

    pub async fn get_country_statistics(&self) -> Vec<Statistic> {
        let players = self.store.find_all().await;
        calculate::country_statistics(&players)
    }

    /// Persist a new player. First and last name must be non-blank.
    pub async fn create_player(&self, mut player: Player) -> Result<Player, ServiceError> {
        if player.firstname.trim().is_empty() || player.lastname.trim().is_empty() {
            return Err(ServiceError::Validation(
                "First name and last name are required".to_string(),
            ));
        }

        self.store.save(&mut player).await;
        info!("Created player {:?}: {}", player.id, player.full_name());
        Ok(player)
    }

    /// Overwrite the fields present in `patch`.
    pub async fn update_player(
        &self,
        id: PlayerId,
        patch: PlayerPatch,
    ) -> Result<Player, ServiceError> {
        self.store
            .update(id, patch)
            .await
            .ok_or(ServiceError::NotFound(id))
    }

    /// Idempotent: deleting an unknown id succeeds.
    pub async fn delete_player(&self, id: PlayerId) {
        self.store.delete_by_id(id).await;
    }
}
