//! Player storage.
//!
//! - `PlayerStore`: the repository seam the service talks to
//! - `InMemoryPlayerStore`: lock-guarded map backing the API
//! - `snapshot`: best-effort bulk import at startup (JSON or JSONL)

mod memory;
pub mod snapshot;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Player, PlayerId, PlayerPatch};

pub use memory::InMemoryPlayerStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Keyed collection of players.
///
/// Implementations must keep id assignment atomic with respect to
/// concurrent saves.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Snapshot of every stored player.
    async fn find_all(&self) -> Vec<Player>;

    async fn find_by_id(&self, id: PlayerId) -> Option<Player>;

    /// Insert or overwrite by id.
    ///
    /// A player without an id gets `max(id) + 1` (or 1 on an empty store),
    /// written back into `player`.
    async fn save(&self, player: &mut Player);

    /// Apply `patch` to the stored player in one step.
    ///
    /// Returns the updated player, or `None` when the id is unknown. A player
    /// deleted concurrently is never brought back.
    async fn update(&self, id: PlayerId, patch: PlayerPatch) -> Option<Player>;

    /// Remove the player if present. Unknown ids are ignored.
    async fn delete_by_id(&self, id: PlayerId);

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
