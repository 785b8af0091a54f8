//! Persistence for players and match results.
//!
//! The tournament core only talks to storage through [`TournamentStore`]:
//! - [`JsonlStore`]: durable JSONL files under the data directory
//! - [`MemoryStore`]: process-local, used by tests and embedders

mod file_store;
mod jsonl;
mod memory;

pub use file_store::*;
pub use jsonl::*;
pub use memory::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{MatchRecord, Player, PlayerId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Everything the standings calculator needs, read in one pass.
#[derive(Debug, Clone, Default)]
pub struct StandingsSnapshot {
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
}

/// The persistence contract the tournament core depends on.
///
/// Each insert is atomic: allocating the id and writing the record happen
/// as one unit from the caller's point of view.
pub trait TournamentStore: Send + Sync {
    /// Remove all match records. Returns how many were removed.
    fn clear_matches(&self) -> Result<usize, StorageError>;

    /// Remove all players, and with them every match that referenced them.
    fn clear_players(&self) -> Result<usize, StorageError>;

    /// Number of currently registered players.
    fn count_players(&self) -> Result<usize, StorageError>;

    /// Register a new player and return the stored record.
    fn insert_player(&self, name: &str) -> Result<Player, StorageError>;

    /// Record a match outcome and return the stored record.
    fn insert_match(&self, winner: PlayerId, loser: PlayerId)
        -> Result<MatchRecord, StorageError>;

    fn player_exists(&self, id: PlayerId) -> Result<bool, StorageError>;

    /// All players and all matches.
    fn fetch_standings_raw(&self) -> Result<StandingsSnapshot, StorageError>;
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournament_dir(&self) -> PathBuf {
        self.data_dir.join("tournament")
    }

    pub fn sequences_path(&self) -> PathBuf {
        self.tournament_dir().join("sequences.json")
    }

    /// Advisory lock file guarding the tournament files across processes.
    pub fn lock_path(&self) -> PathBuf {
        self.tournament_dir().join(".lock")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
