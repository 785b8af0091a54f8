//! Pairing model — one matchup of the next round.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A single next-round pairing between two players adjacent in the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// Table number, 1-based, in rank order
    pub table: u32,

    /// Higher-ranked player id
    pub id1: PlayerId,

    /// Higher-ranked player name
    pub name1: String,

    /// Lower-ranked player id
    pub id2: PlayerId,

    /// Lower-ranked player name
    pub name2: String,
}

impl Pairing {
    pub fn new(table: u32, id1: PlayerId, name1: String, id2: PlayerId, name2: String) -> Self {
        Self {
            table,
            id1,
            name1,
            id2,
            name2,
        }
    }

    /// Both player ids, higher-ranked first.
    pub fn player_ids(&self) -> [PlayerId; 2] {
        [self.id1, self.id2]
    }
}
