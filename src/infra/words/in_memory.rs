// In-memory implementation of WordStore.
//
// Useful for tests and for embedders that want the matching behaviour
// without a database; it follows the same contract as the SQLite store.

use crate::core::words::{BannedWord, WordFilterError, WordStore};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// DashMap keeps this safe to share across async tasks without a Mutex.
pub struct InMemoryWordStore {
    rows: DashMap<i64, BannedWord>,
    next_id: AtomicI64,
}

impl InMemoryWordStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryWordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WordStore for InMemoryWordStore {
    async fn count_word(&self, word: &str) -> Result<u64, WordFilterError> {
        Ok(self.rows.iter().filter(|r| r.word == word).count() as u64)
    }

    async fn insert_word(&self, word: &str) -> Result<i64, WordFilterError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.insert(
            id,
            BannedWord {
                id,
                word: word.to_string(),
                created: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn all_words(&self, search: Option<&str>) -> Result<Vec<BannedWord>, WordFilterError> {
        let mut rows: Vec<BannedWord> = self
            .rows
            .iter()
            .filter(|r| search.map_or(true, |s| r.word.contains(s)))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn delete_word(&self, id: i64) -> Result<bool, WordFilterError> {
        Ok(self.rows.remove(&id).is_some())
    }
}
