//! Swiss pairing generation.

use thiserror::Error;

use crate::models::{Pairing, Standing};

/// Reasons a round cannot be paired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error("At least 2 players are needed for pairings, found {count}")]
    InsufficientPlayers { count: usize },

    #[error("Cannot pair an odd number of players ({count}); byes are not supported")]
    OddPlayerCount { count: usize },
}

/// Pair ranked standings for the next round.
///
/// Rank positions 0, 2, 4, … sit on the left and 1, 3, 5, … on the right, and
/// the two sequences are zipped, so every pair is two players adjacent in the
/// standings. Tables are numbered from 1 in rank order.
pub fn pair_standings(standings: &[Standing]) -> Result<Vec<Pairing>, PairingError> {
    let count = standings.len();
    if count < 2 {
        return Err(PairingError::InsufficientPlayers { count });
    }
    if count % 2 != 0 {
        return Err(PairingError::OddPlayerCount { count });
    }

    let left = standings.iter().step_by(2);
    let right = standings.iter().skip(1).step_by(2);

    Ok(left
        .zip(right)
        .zip(1u32..)
        .map(|((a, b), table)| Pairing::new(table, a.id, a.name.clone(), b.id, b.name.clone()))
        .collect())
}
