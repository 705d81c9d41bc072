//! In-memory aggregation of chips collected per player.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::LeaderboardEntry;

#[derive(Debug, Clone, Copy)]
struct Score {
    total: u64,
    /// Order of first appearance, used to break ties deterministically.
    seq: u64,
}

#[derive(Debug, Default)]
struct Scores {
    by_player: HashMap<String, Score>,
    next_seq: u64,
}

/// Thread-safe player → cumulative chip count mapping.
///
/// Cloning is cheap and yields another handle to the same totals. Every
/// mutation and every ranked read happens under a single mutex, so readers
/// never observe a partially applied increment.
#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    scores: Arc<Mutex<Scores>>,
}

impl ScoreStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `chips` to `player`'s total, creating the entry if absent.
    ///
    /// Non-positive deltas and empty player names are ignored, so totals
    /// never decrease and every entry is named.
    pub fn increment(&self, player: &str, chips: i64) {
        if chips <= 0 || player.is_empty() {
            return;
        }
        let chips = chips as u64;

        let mut scores = self.lock();
        let seq = scores.next_seq;
        match scores.by_player.get_mut(player) {
            Some(score) => score.total = score.total.saturating_add(chips),
            None => {
                scores
                    .by_player
                    .insert(player.to_owned(), Score { total: chips, seq });
                scores.next_seq += 1;
            }
        }
    }

    /// Returns the `limit` players with the highest totals, highest first.
    ///
    /// Ties keep the order in which players first appeared.
    pub fn top_n(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut ranked: Vec<(String, Score)> = {
            let scores = self.lock();
            scores
                .by_player
                .iter()
                .map(|(player, score)| (player.clone(), *score))
                .collect()
        };

        ranked.sort_unstable_by(|(_, a), (_, b)| b.total.cmp(&a.total).then(a.seq.cmp(&b.seq)));
        ranked.truncate(limit);

        ranked
            .into_iter()
            .map(|(player, score)| LeaderboardEntry {
                player,
                chips: score.total,
            })
            .collect()
    }

    /// Current total for a single player.
    pub fn total(&self, player: &str) -> Option<u64> {
        self.lock().by_player.get(player).map(|score| score.total)
    }

    pub fn len(&self) -> usize {
        self.lock().by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every critical section is a single insert or add, so a panic elsewhere
    // can't leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, Scores> {
        self.scores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
