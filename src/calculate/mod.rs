//! Standings and pairing calculation.
//!
//! Pure functions over stored records:
//! - Win/loss aggregation and ranking
//! - Swiss pairing of adjacent-ranked players

mod pairings;
mod standings;

pub use pairings::*;
pub use standings::*;
