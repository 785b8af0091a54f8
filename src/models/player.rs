//! Registered player model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A player registered in the tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier (assigned by the store)
    pub id: PlayerId,

    /// Full name as registered, need not be unique
    pub name: String,

    /// When the player was registered
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            registered_at: Utc::now(),
        }
    }
}
