//! Best score across sessions
//!
//! A single integer persisted under `HIGH_SCORE_KEY`.

use crate::config::HIGH_SCORE_KEY;
use crate::persistence::KeyValueStore;

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Parse a stored value. Missing or non-numeric values count as zero.
    pub fn parse(raw: Option<&str>) -> Self {
        let best = raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0);
        Self { best }
    }

    /// Whether a score would set a new record
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished run's score.
    /// Returns true (and writes through to the store) when it beat the record.
    pub fn submit<S: KeyValueStore + ?Sized>(&mut self, score: u32, store: &mut S) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.save(store);
        log::info!("New high score: {}", score);
        true
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let loaded = Self::parse(store.get(HIGH_SCORE_KEY).as_deref());
        log::info!("Loaded high score {}", loaded.best);
        loaded
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set(HIGH_SCORE_KEY, &self.best.to_string());
    }
}
