//! Durable tournament store backed by JSONL files.

use std::fs::{self, File, OpenOptions};
use std::sync::{Mutex, MutexGuard};

use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    EntityType, JsonlReader, JsonlWriter, StandingsSnapshot, StorageConfig, StorageError,
    TournamentStore,
};
use crate::models::{MatchId, MatchRecord, Player, PlayerId};

/// Next ids to hand out. Persisted so ids are never reused after a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Sequences {
    next_player_id: u64,
    next_match_id: u64,
}

/// Held for the duration of one store operation. The OS lock on `file` is
/// released when it is dropped.
struct StoreLock<'a> {
    _local: MutexGuard<'a, ()>,
    _file: File,
}

/// Tournament store that keeps players and matches in JSONL files.
///
/// Safe to share a data directory between processes: every operation holds
/// an advisory lock on `tournament/.lock`, shared for reads and exclusive
/// for writes.
pub struct JsonlStore {
    config: StorageConfig,
    // Serializes callers within this process; the file lock covers other processes.
    lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn acquire(&self, exclusive: bool) -> Result<StoreLock<'_>, StorageError> {
        let local = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;

        fs::create_dir_all(self.config.tournament_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.config.lock_path())?;
        if exclusive {
            FileExt::lock_exclusive(&file)?;
        } else {
            FileExt::lock_shared(&file)?;
        }

        Ok(StoreLock {
            _local: local,
            _file: file,
        })
    }

    fn read_lock(&self) -> Result<StoreLock<'_>, StorageError> {
        self.acquire(false)
    }

    fn write_lock(&self) -> Result<StoreLock<'_>, StorageError> {
        self.acquire(true)
    }

    fn players(&self) -> JsonlReader<Player> {
        JsonlReader::for_entity(&self.config, EntityType::Player)
    }

    fn matches(&self) -> JsonlReader<MatchRecord> {
        JsonlReader::for_entity(&self.config, EntityType::Match)
    }

    /// Load the sequence file, falling back to the highest stored ids when it is missing.
    fn load_sequences(&self) -> Result<Sequences, StorageError> {
        let path = self.config.sequences_path();
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            return Ok(serde_json::from_str(&contents)?);
        }

        let next_player_id = self
            .players()
            .read_all()?
            .iter()
            .map(|p| p.id.get() + 1)
            .max()
            .unwrap_or(1);
        let next_match_id = self
            .matches()
            .read_all()?
            .iter()
            .map(|m| m.id.get() + 1)
            .max()
            .unwrap_or(1);

        Ok(Sequences {
            next_player_id,
            next_match_id,
        })
    }

    fn save_sequences(&self, sequences: &Sequences) -> Result<(), StorageError> {
        let path = self.config.sequences_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(sequences)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl TournamentStore for JsonlStore {
    fn clear_matches(&self) -> Result<usize, StorageError> {
        let _lock = self.write_lock()?;
        let removed = self.matches().count()?;
        JsonlWriter::<MatchRecord>::for_entity(&self.config, EntityType::Match).write_all(&[])?;
        debug!("Cleared {} matches", removed);
        Ok(removed)
    }

    fn clear_players(&self) -> Result<usize, StorageError> {
        let _lock = self.write_lock()?;
        let removed = self.players().count()?;
        // Players go first: if the second truncate fails, leftover matches
        // only name unknown ids and count towards nobody.
        JsonlWriter::<Player>::for_entity(&self.config, EntityType::Player).write_all(&[])?;
        JsonlWriter::<MatchRecord>::for_entity(&self.config, EntityType::Match).write_all(&[])?;
        debug!("Cleared {} players and their matches", removed);
        Ok(removed)
    }

    fn count_players(&self) -> Result<usize, StorageError> {
        let _lock = self.read_lock()?;
        self.players().count()
    }

    fn insert_player(&self, name: &str) -> Result<Player, StorageError> {
        let _lock = self.write_lock()?;
        let mut sequences = self.load_sequences()?;
        let player = Player::new(PlayerId::new(sequences.next_player_id), name.to_string());

        // Reserve the id before writing the record so a crash can skip an id but never reuse one.
        sequences.next_player_id += 1;
        self.save_sequences(&sequences)?;
        JsonlWriter::for_entity(&self.config, EntityType::Player).append(&player)?;

        debug!("Inserted player {} ({})", player.id, player.name);
        Ok(player)
    }

    fn insert_match(
        &self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchRecord, StorageError> {
        let _lock = self.write_lock()?;
        let mut sequences = self.load_sequences()?;
        let record = MatchRecord::new(MatchId::new(sequences.next_match_id), winner, loser);

        sequences.next_match_id += 1;
        self.save_sequences(&sequences)?;
        JsonlWriter::for_entity(&self.config, EntityType::Match).append(&record)?;

        debug!("Inserted match {}: {} beat {}", record.id, winner, loser);
        Ok(record)
    }

    fn player_exists(&self, id: PlayerId) -> Result<bool, StorageError> {
        let _lock = self.read_lock()?;
        Ok(!self.players().read_where(|p| p.id == id)?.is_empty())
    }

    fn fetch_standings_raw(&self) -> Result<StandingsSnapshot, StorageError> {
        let _lock = self.read_lock()?;
        Ok(StandingsSnapshot {
            players: self.players().read_all()?,
            matches: self.matches().read_all()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::entity_path;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> JsonlStore {
        JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    #[test]
    fn test_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        assert_eq!(store.count_players().unwrap(), 0);
        let snapshot = store.fetch_standings_raw().unwrap();
        assert!(snapshot.players.is_empty());
        assert!(snapshot.matches.is_empty());
    }

    #[test]
    fn test_insert_player_assigns_sequential_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let a = store.insert_player("Alice").unwrap();
        let b = store.insert_player("Bob").unwrap();

        assert_eq!(a.id, PlayerId::new(1));
        assert_eq!(b.id, PlayerId::new(2));
        assert_eq!(store.count_players().unwrap(), 2);
        assert!(store.player_exists(b.id).unwrap());
        assert!(!store.player_exists(PlayerId::new(3)).unwrap());
    }

    #[test]
    fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = test_store(&temp_dir);
            let a = store.insert_player("Alice").unwrap();
            let b = store.insert_player("Bob").unwrap();
            store.insert_match(a.id, b.id).unwrap();
        }

        let store = test_store(&temp_dir);
        let snapshot = store.fetch_standings_raw().unwrap();
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.matches.len(), 1);
        assert_eq!(snapshot.matches[0].winner, PlayerId::new(1));
        assert_eq!(snapshot.matches[0].loser, PlayerId::new(2));

        let c = store.insert_player("Carol").unwrap();
        assert_eq!(c.id, PlayerId::new(3));
    }

    #[test]
    fn test_clear_matches_keeps_players() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let a = store.insert_player("Alice").unwrap();
        let b = store.insert_player("Bob").unwrap();
        store.insert_match(a.id, b.id).unwrap();
        store.insert_match(b.id, a.id).unwrap();

        assert_eq!(store.clear_matches().unwrap(), 2);

        let snapshot = store.fetch_standings_raw().unwrap();
        assert_eq!(snapshot.players.len(), 2);
        assert!(snapshot.matches.is_empty());
    }

    #[test]
    fn test_clear_players_cascades_to_matches() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let a = store.insert_player("Alice").unwrap();
        let b = store.insert_player("Bob").unwrap();
        store.insert_match(a.id, b.id).unwrap();

        assert_eq!(store.clear_players().unwrap(), 2);

        let snapshot = store.fetch_standings_raw().unwrap();
        assert!(snapshot.players.is_empty());
        assert!(snapshot.matches.is_empty());
    }

    #[test]
    fn test_failed_clear_players_keeps_matches() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let a = store.insert_player("Alice").unwrap();
        let b = store.insert_player("Bob").unwrap();
        store.insert_match(a.id, b.id).unwrap();

        // A directory where the players file should be makes every players write fail.
        let players_path = entity_path(store.config(), EntityType::Player);
        fs::remove_file(&players_path).unwrap();
        fs::create_dir(&players_path).unwrap();

        assert!(store.clear_players().is_err());

        let matches = JsonlReader::<MatchRecord>::for_entity(store.config(), EntityType::Match)
            .read_all()
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].winner, a.id);
    }

    #[test]
    fn test_two_stores_on_one_dir_never_share_ids() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let handles: Vec<_> = (0..2)
            .map(|worker| {
                let dir = dir.clone();
                std::thread::spawn(move || {
                    let store = JsonlStore::new(StorageConfig::new(dir));
                    (0..50)
                        .map(|i| {
                            store
                                .insert_player(&format!("Worker {} #{}", worker, i))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut issued = Vec::new();
        for handle in handles {
            issued.extend(handle.join().unwrap());
        }
        let unique: HashSet<PlayerId> = issued.iter().copied().collect();
        assert_eq!(unique.len(), 100);

        let store = test_store(&temp_dir);
        assert_eq!(store.count_players().unwrap(), 100);
        let stored: HashSet<PlayerId> = store
            .fetch_standings_raw()
            .unwrap()
            .players
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(stored, unique);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        store.insert_player("Alice").unwrap();
        store.insert_player("Bob").unwrap();
        store.clear_players().unwrap();

        let c = store.insert_player("Carol").unwrap();
        assert_eq!(c.id, PlayerId::new(3));
    }

    #[test]
    fn test_sequences_recovered_from_records() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        store.insert_player("Alice").unwrap();
        store.insert_player("Bob").unwrap();
        fs::remove_file(store.config().sequences_path()).unwrap();

        let c = store.insert_player("Carol").unwrap();
        assert_eq!(c.id, PlayerId::new(3));
    }

    #[test]
    fn test_unwritable_data_dir_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let store = JsonlStore::new(StorageConfig::new(blocker));
        assert!(matches!(
            store.insert_player("Alice"),
            Err(StorageError::Io(_))
        ));
    }
}
