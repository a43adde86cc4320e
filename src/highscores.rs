//! Personal best tracking
//!
//! The best run is kept behind the `BestStore` trait. Storage failures never
//! interrupt play: they are logged and treated as "no best recorded".

use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceError;
use crate::sim::RunSummary;

/// Best run recorded on this machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestRecord {
    pub score: u64,
    pub level: u32,
    pub dust: u64,
}

impl From<RunSummary> for BestRecord {
    fn from(summary: RunSummary) -> Self {
        Self {
            score: summary.score,
            level: summary.level,
            dust: summary.dust,
        }
    }
}

/// Local storage for the personal best
pub trait BestStore {
    fn get_best(&self) -> Result<BestRecord, PersistenceError>;
    fn set_best(&mut self, record: &BestRecord) -> Result<(), PersistenceError>;
}

/// In-memory store, used by tests and when no save path is configured
#[derive(Debug, Clone, Default)]
pub struct MemoryBestStore {
    record: Option<BestRecord>,
    /// Simulate an unavailable backend
    pub fail: bool,
}

impl MemoryBestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every operation errors
    pub fn unavailable() -> Self {
        Self {
            record: None,
            fail: true,
        }
    }
}

impl BestStore for MemoryBestStore {
    fn get_best(&self) -> Result<BestRecord, PersistenceError> {
        if self.fail {
            return Err(PersistenceError::Unavailable("memory store disabled".into()));
        }
        Ok(self.record.unwrap_or_default())
    }

    fn set_best(&mut self, record: &BestRecord) -> Result<(), PersistenceError> {
        if self.fail {
            return Err(PersistenceError::Unavailable("memory store disabled".into()));
        }
        self.record = Some(*record);
        Ok(())
    }
}

/// Read the best, treating any failure as "no best recorded"
pub fn load_best(store: &dyn BestStore) -> BestRecord {
    match store.get_best() {
        Ok(record) => record,
        Err(err) => {
            log::warn!("Could not read personal best, starting fresh: {}", err);
            BestRecord::default()
        }
    }
}

/// Record a finished run if it beats the stored best.
/// Returns true when a new best was set.
pub fn record_best(store: &mut dyn BestStore, summary: &RunSummary) -> bool {
    let best = load_best(store);
    if summary.score <= best.score {
        return false;
    }

    let record = BestRecord::from(*summary);
    match store.set_best(&record) {
        Ok(()) => {
            log::info!("New personal best: {} (level {})", record.score, record.level);
            true
        }
        Err(err) => {
            log::warn!("Could not save personal best: {}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u64) -> RunSummary {
        RunSummary {
            score,
            level: 3,
            dust: 12,
        }
    }

    #[test]
    fn test_first_run_sets_best() {
        let mut store = MemoryBestStore::new();
        assert!(record_best(&mut store, &summary(500)));
        assert_eq!(store.get_best().unwrap().score, 500);
    }

    #[test]
    fn test_only_strictly_better_overwrites() {
        let mut store = MemoryBestStore::new();
        record_best(&mut store, &summary(500));
        assert!(!record_best(&mut store, &summary(500)));
        assert!(!record_best(&mut store, &summary(200)));
        assert!(record_best(&mut store, &summary(501)));
        assert_eq!(load_best(&store).score, 501);
    }

    #[test]
    fn test_zero_score_is_not_a_best() {
        let mut store = MemoryBestStore::new();
        assert!(!record_best(&mut store, &summary(0)));
    }

    #[test]
    fn test_unavailable_store_is_no_best() {
        let mut store = MemoryBestStore::unavailable();
        assert_eq!(load_best(&store), BestRecord::default());
        assert!(!record_best(&mut store, &summary(900)));
    }
}
