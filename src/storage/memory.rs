//! In-memory tournament store.

use std::sync::{Mutex, MutexGuard};

use super::{StandingsSnapshot, StorageError, TournamentStore};
use crate::models::{MatchId, MatchRecord, Player, PlayerId};

#[derive(Debug)]
struct MemoryState {
    players: Vec<Player>,
    matches: Vec<MatchRecord>,
    next_player_id: u64,
    next_match_id: u64,
}

/// Process-local store. Nothing survives the process.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                players: Vec::new(),
                matches: Vec::new(),
                next_player_id: 1,
                next_match_id: 1,
            }),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentStore for MemoryStore {
    fn clear_matches(&self) -> Result<usize, StorageError> {
        let mut state = self.state()?;
        Ok(state.matches.drain(..).count())
    }

    fn clear_players(&self) -> Result<usize, StorageError> {
        let mut state = self.state()?;
        state.matches.clear();
        Ok(state.players.drain(..).count())
    }

    fn count_players(&self) -> Result<usize, StorageError> {
        Ok(self.state()?.players.len())
    }

    fn insert_player(&self, name: &str) -> Result<Player, StorageError> {
        let mut state = self.state()?;
        let player = Player::new(PlayerId::new(state.next_player_id), name.to_string());
        state.next_player_id += 1;
        state.players.push(player.clone());
        Ok(player)
    }

    fn insert_match(
        &self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchRecord, StorageError> {
        let mut state = self.state()?;
        let record = MatchRecord::new(MatchId::new(state.next_match_id), winner, loser);
        state.next_match_id += 1;
        state.matches.push(record.clone());
        Ok(record)
    }

    fn player_exists(&self, id: PlayerId) -> Result<bool, StorageError> {
        Ok(self.state()?.players.iter().any(|p| p.id == id))
    }

    fn fetch_standings_raw(&self) -> Result<StandingsSnapshot, StorageError> {
        let state = self.state()?;
        Ok(StandingsSnapshot {
            players: state.players.clone(),
            matches: state.matches.clone(),
        })
    }
}
