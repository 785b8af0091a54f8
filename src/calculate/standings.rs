//! Standings aggregation.

use std::collections::HashMap;

use crate::models::{MatchRecord, Player, PlayerId, Standing};

/// Count how often each player id occurs.
fn tally(ids: impl Iterator<Item = PlayerId>) -> HashMap<PlayerId, u32> {
    let mut counts = HashMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

/// Compute ranked standings from the full player and match sets.
///
/// Wins and losses are tallied independently per player id and then joined
/// onto the player list, so every registered player appears even with no
/// matches. Matches naming an unregistered id count towards nobody.
///
/// Ranking is by wins descending, then by player id ascending (registration
/// order), which gives a total order even when records are tied.
pub fn compute_standings(players: &[Player], matches: &[MatchRecord]) -> Vec<Standing> {
    let wins = tally(matches.iter().map(|m| m.winner));
    let losses = tally(matches.iter().map(|m| m.loser));

    let mut standings: Vec<Standing> = players
        .iter()
        .map(|player| {
            let won = wins.get(&player.id).copied().unwrap_or(0);
            let lost = losses.get(&player.id).copied().unwrap_or(0);
            Standing::new(player.id, player.name.clone(), won, won + lost)
        })
        .collect();

    standings.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.id.cmp(&b.id)));
    standings
}
