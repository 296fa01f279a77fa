//! The shared transposition map.
//!
//! Scores from completed static evaluations are cached under the position's
//! Zobrist key and reused to reorder moves in later searches of the same
//! position. The map is shared by every search task: reads take the shared
//! side of a readers-writer lock, writes the exclusive side.

use std::collections::HashMap;
use std::sync::RwLock;

/// A cached evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtEntry {
    /// Distance from the root at which the score was stored.
    pub depth: u32,
    /// The evaluated score, White-positive.
    pub score: f64,
}

/// Position key -> evaluation cache, safe to share across search tasks.
#[derive(Debug, Default)]
pub struct TranspositionMap {
    entries: RwLock<HashMap<u64, TtEntry>>,
}

impl TranspositionMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached score. Any stored depth qualifies; reordering does
    /// not need exact-depth matches.
    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        self.entries
            .read()
            .expect("transposition map lock poisoned")
            .get(&key)
            .copied()
    }

    /// Stores a score unless an entry from greater depth already exists.
    pub fn store(&self, key: u64, depth: u32, score: f64) {
        let mut entries = self
            .entries
            .write()
            .expect("transposition map lock poisoned");
        match entries.get(&key) {
            Some(existing) if existing.depth > depth => {}
            _ => {
                entries.insert(key, TtEntry { depth, score });
            }
        }
    }

    /// Returns the number of cached positions.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("transposition map lock poisoned")
            .len()
    }

    /// Returns true if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
