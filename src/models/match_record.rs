//! Match result model — the outcome of a single game between two players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, PlayerId};

/// A recorded match outcome. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier (assigned by the store)
    pub id: MatchId,

    /// Player who won
    pub winner: PlayerId,

    /// Player who lost
    pub loser: PlayerId,

    /// When the result was reported
    pub reported_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(id: MatchId, winner: PlayerId, loser: PlayerId) -> Self {
        Self {
            id,
            winner,
            loser,
            reported_at: Utc::now(),
        }
    }
}
