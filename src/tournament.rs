//! Tournament operations.
//!
//! Validates input, talks to the store, and runs the standings and pairing
//! calculations. Every operation is a single attempt: errors go straight back
//! to the caller.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::calculate::{compute_standings, pair_standings, PairingError};
use crate::models::{MatchRecord, Pairing, Player, PlayerId, Standing};
use crate::storage::{StorageError, TournamentStore};

/// Errors surfaced by tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    #[error("Not enough players to pair: {count} registered, at least 2 required")]
    InsufficientPlayers { count: usize },

    #[error("Cannot pair an odd number of players ({count}); byes are not supported")]
    OddPlayerCount { count: usize },

    #[error("Invalid match report: {0}")]
    InvalidMatchReport(String),

    #[error("Player name must not be empty")]
    EmptyPlayerName,
}

impl From<PairingError> for TournamentError {
    fn from(err: PairingError) -> Self {
        match err {
            PairingError::InsufficientPlayers { count } => {
                TournamentError::InsufficientPlayers { count }
            }
            PairingError::OddPlayerCount { count } => TournamentError::OddPlayerCount { count },
        }
    }
}

/// A Swiss-system tournament over some store.
#[derive(Clone)]
pub struct Tournament {
    store: Arc<dyn TournamentStore>,
}

impl Tournament {
    pub fn new(store: Arc<dyn TournamentStore>) -> Self {
        Self { store }
    }

    /// Register a player. Names are trimmed and need not be unique.
    pub fn register_player(&self, name: &str) -> Result<Player, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }

        let player = self.store.insert_player(name)?;
        info!(player_id = %player.id, name = %player.name, "Registered player");
        Ok(player)
    }

    /// Record that `winner` beat `loser`.
    pub fn report_match(
        &self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchRecord, TournamentError> {
        if winner == loser {
            return Err(TournamentError::InvalidMatchReport(format!(
                "player {} cannot play against themselves",
                winner
            )));
        }
        for (role, id) in [("winner", winner), ("loser", loser)] {
            if !self.store.player_exists(id)? {
                return Err(TournamentError::InvalidMatchReport(format!(
                    "{} {} is not a registered player",
                    role, id
                )));
            }
        }

        let record = self.store.insert_match(winner, loser)?;
        info!(match_id = %record.id, %winner, %loser, "Reported match");
        Ok(record)
    }

    /// Current standings, best record first.
    pub fn player_standings(&self) -> Result<Vec<Standing>, TournamentError> {
        let snapshot = self.store.fetch_standings_raw()?;
        Ok(compute_standings(&snapshot.players, &snapshot.matches))
    }

    /// Pairings for the next round.
    pub fn swiss_pairings(&self) -> Result<Vec<Pairing>, TournamentError> {
        let standings = self.player_standings()?;
        let pairings = pair_standings(&standings)?;
        info!(tables = pairings.len(), "Generated pairings");
        Ok(pairings)
    }

    pub fn count_players(&self) -> Result<usize, TournamentError> {
        Ok(self.store.count_players()?)
    }

    /// Remove every match result. Players stay registered.
    pub fn delete_matches(&self) -> Result<usize, TournamentError> {
        let removed = self.store.clear_matches()?;
        info!(removed, "Deleted matches");
        Ok(removed)
    }

    /// Remove every player, together with all match results.
    pub fn delete_players(&self) -> Result<usize, TournamentError> {
        let removed = self.store.clear_players()?;
        info!(removed, "Deleted players");
        Ok(removed)
    }
}
