//! Player snapshot import.
//!
//! Two formats are accepted:
//! - JSON Lines (`*.jsonl`): one player object per line
//! - JSON document: `{"players": [...]}`
//!
//! Loading at startup is best-effort: [`load_or_empty`] never fails.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::Player;

/// Top-level shape of a JSON snapshot document.
#[derive(Debug, Default, Deserialize)]
struct PlayerListWrapper {
    #[serde(default)]
    players: Vec<Player>,
}

/// Snapshot file reader.
pub struct SnapshotReader {
    path: PathBuf,
}

impl SnapshotReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn is_jsonl(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"))
    }

    /// Read every player in the snapshot.
    pub fn read_all(&self) -> Result<Vec<Player>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        if self.is_jsonl() {
            self.read_lines()
        } else {
            self.read_document()
        }
    }

    fn read_document(&self) -> Result<Vec<Player>, StorageError> {
        let file = File::open(&self.path)?;
        let wrapper: PlayerListWrapper = serde_json::from_reader(BufReader::new(file))?;
        debug!("Read {} players from {:?}", wrapper.players.len(), self.path);
        Ok(wrapper.players)
    }

    /// Malformed lines are skipped with a warning.
    fn read_lines(&self) -> Result<Vec<Player>, StorageError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut players = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(player) => players.push(player),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", index + 1, self.path, e);
                }
            }
        }

        debug!("Read {} players from {:?}", players.len(), self.path);
        Ok(players)
    }
}

/// Load players from `path`, falling back to an empty list on any failure.
pub fn load_or_empty(path: &Path) -> Vec<Player> {
    let reader = SnapshotReader::new(path);
    match reader.read_all() {
        Ok(players) => {
            info!("Loaded {} players from {:?}", players.len(), path);
            players
        }
        Err(StorageError::PathNotFound(_)) => {
            warn!(
                "Snapshot {:?} not found, the store will be empty at start",
                path
            );
            Vec::new()
        }
        Err(e) => {
            warn!(
                "Unable to load snapshot {:?}, the store will be empty at start: {}",
                path, e
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FEDERER: &str = r#"{"id": 17, "firstname": "Roger", "lastname": "Federer", "country": {"code": "SUI"}, "data": {"rank": 3, "height": 185, "last": [1, 1, 1, 0, 1]}}"#;
    const WILLIAMS: &str = r#"{"id": 65, "firstname": "Serena", "lastname": "Williams", "sex": "F", "country": {"code": "USA"}}"#;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_json_document() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "headtohead.json",
            &format!(r#"{{"players": [{}, {}]}}"#, FEDERER, WILLIAMS),
        );

        let players = SnapshotReader::new(&path).read_all().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id, Some(17));
        assert_eq!(players[1].sex.as_deref(), Some("F"));
    }

    #[test]
    fn test_read_json_document_without_players_key() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.json", "{}");

        let players = SnapshotReader::new(&path).read_all().unwrap();
        assert!(players.is_empty());
    }

    #[test]
    fn test_read_jsonl_skips_bad_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "players.jsonl",
            &format!("{}\nnot json\n\n{}\n", FEDERER, WILLIAMS),
        );

        let reader = SnapshotReader::new(&path);
        assert!(reader.exists());
        let players = reader.read_all().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].full_name(), "Roger Federer");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let reader = SnapshotReader::new(dir.path().join("missing.json"));

        assert!(!reader.exists());
        assert!(matches!(
            reader.read_all(),
            Err(StorageError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_read_malformed_document() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "broken.json", r#"{"players": [ {"id": "#);

        assert!(matches!(
            SnapshotReader::new(&path).read_all(),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn test_read_document_with_explicit_nulls() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "nulls.json",
            &format!(
                r#"{{"players": [{}, {{"id": 2, "firstname": "Andy", "lastname": "Murray", "shortname": null, "country": null, "data": {{"rank": 2, "weight": null, "last": null}}}}]}}"#,
                FEDERER
            ),
        );

        let players = load_or_empty(&path);
        assert_eq!(players.len(), 2);
        assert_eq!(players[1].shortname, None);
        let data = players[1].data.as_ref().unwrap();
        assert_eq!(data.rank, Some(2));
        assert!(data.last.is_empty());
    }

    #[test]
    fn test_load_or_empty_recovers() {
        let dir = TempDir::new().unwrap();
        assert!(load_or_empty(&dir.path().join("missing.json")).is_empty());

        let broken = write_file(&dir, "broken.json", "[[[");
        assert!(load_or_empty(&broken).is_empty());

        let good = write_file(&dir, "good.json", &format!(r#"{{"players": [{}]}}"#, FEDERER));
        assert_eq!(load_or_empty(&good).len(), 1);
    }
}
