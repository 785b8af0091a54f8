//! Derived standings model.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A player's current record. Computed fresh from the match history, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Player id
    pub id: PlayerId,

    /// Player name
    pub name: String,

    /// Matches won
    pub wins: u32,

    /// Matches played (wins + losses)
    pub matches: u32,
}

impl Standing {
    pub fn new(id: PlayerId, name: String, wins: u32, matches: u32) -> Self {
        debug_assert!(matches >= wins);
        Self {
            id,
            name,
            wins,
            matches,
        }
    }

    /// Matches lost.
    pub fn losses(&self) -> u32 {
        self.matches - self.wins
    }
}
