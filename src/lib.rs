//! # Swiss Tracker
//!
//! Swiss-system tournament tracking: players, match results, standings,
//! and next-round pairings.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, standings, pairings)
//! - **storage**: Persistence contract plus JSONL and in-memory stores
//! - **calculate**: Standings aggregation and Swiss pairing
//! - **tournament**: Validated tournament operations over a store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;
pub mod tournament;

pub use models::*;
pub use tournament::{Tournament, TournamentError};
