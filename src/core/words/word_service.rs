// Banned-word filter - core matching logic for blocked phrases.
//
// This service handles:
// - Case-insensitive substring matching against a cached word list
// - Duplicate-safe insertion (words are stored lowercased)
// - Listing with a storage-level substring search
//
// NO storage dependencies here - just the matching logic and the port.

use super::word_models::BannedWord;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum WordFilterError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting banned words.
///
/// Words handed to the store are already lowercased; the store compares and
/// returns them verbatim.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Count rows whose word matches exactly.
    async fn count_word(&self, word: &str) -> Result<u64, WordFilterError>;

    /// Insert a word and return its new row id.
    async fn insert_word(&self, word: &str) -> Result<i64, WordFilterError>;

    /// Fetch all words, or only those containing `search` as a
    /// case-sensitive substring.
    async fn all_words(&self, search: Option<&str>) -> Result<Vec<BannedWord>, WordFilterError>;

    /// Delete a word by id. Returns false when no row matched.
    async fn delete_word(&self, id: i64) -> Result<bool, WordFilterError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Banned-word filter with a lazily loaded in-memory cache.
///
/// The cache is filled on the first `contains_blocked_word` call and only
/// refreshed by an explicit `reload` or a `list_words` call - never
/// automatically after a mutation. Reloads swap the whole list in one write,
/// so concurrent readers see either the old list or the new one, never a
/// partially rebuilt one.
pub struct WordFilterService<S: WordStore> {
    store: S,
    cache: RwLock<Option<Arc<Vec<String>>>>,
}

impl<S: WordStore> WordFilterService<S> {
    /// Create a new word filter with the given store. The cache starts empty.
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
        }
    }

    /// Add a word or phrase to the banned list.
    ///
    /// The text is trimmed and lowercased before storage. Returns false
    /// without inserting when the text is empty or a case-insensitive
    /// duplicate of an existing entry. The cache is left untouched; callers
    /// must `reload` (or `list_words`) to pick the new word up.
    pub async fn add_word(&self, text: &str) -> Result<bool, WordFilterError> {
        let word = text.trim().to_lowercase();
        if word.is_empty() {
            return Ok(false);
        }

        if self.store.count_word(&word).await? > 0 {
            tracing::debug!(word = %word, "rejected duplicate banned word");
            return Ok(false);
        }

        self.store.insert_word(&word).await?;
        Ok(true)
    }

    /// Check whether `text` contains any banned word as a case-insensitive
    /// substring. Loads the cache from storage on first use; returns false
    /// when the banned list is empty.
    pub async fn contains_blocked_word(&self, text: &str) -> Result<bool, WordFilterError> {
        let words = self.cached_words().await?;
        if words.is_empty() {
            return Ok(false);
        }

        // O(words * text) scan; fine at blocklist scale. Only the boolean is
        // observable, so a faster matcher could be swapped in later.
        let haystack = text.to_lowercase();
        Ok(words.iter().any(|word| haystack.contains(word.as_str())))
    }

    /// List banned words, optionally filtered to those containing `search`
    /// (a storage-level substring match). Refreshes the cache as a side
    /// effect; a filtered listing still refreshes from the full table so the
    /// cache never shrinks to a search subset.
    pub async fn list_words(&self, search: Option<&str>) -> Result<Vec<BannedWord>, WordFilterError> {
        let search = search.filter(|s| !s.is_empty());
        let rows = self.store.all_words(search).await?;

        if search.is_none() {
            self.swap_cache(&rows).await;
        } else {
            self.reload().await?;
        }
        Ok(rows)
    }

    /// Remove a banned word by id. Returns false when no row matched. The
    /// cache keeps serving the old list until the next reload.
    pub async fn remove_word(&self, id: i64) -> Result<bool, WordFilterError> {
        self.store.delete_word(id).await
    }

    /// Refetch the word list from storage, replacing the cache atomically.
    /// Returns the number of cached words.
    pub async fn reload(&self) -> Result<usize, WordFilterError> {
        let rows = self.store.all_words(None).await?;
        let count = rows.len();
        self.swap_cache(&rows).await;
        Ok(count)
    }

    async fn cached_words(&self) -> Result<Arc<Vec<String>>, WordFilterError> {
        if let Some(words) = self.cache.read().await.clone() {
            return Ok(words);
        }

        let rows = self.store.all_words(None).await?;
        let words: Arc<Vec<String>> = Arc::new(rows.into_iter().map(|row| row.word).collect());
        *self.cache.write().await = Some(words.clone());
        Ok(words)
    }

    async fn swap_cache(&self, rows: &[BannedWord]) {
        let words: Arc<Vec<String>> = Arc::new(rows.iter().map(|row| row.word.clone()).collect());
        *self.cache.write().await = Some(words);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// In-memory store for testing
    struct MockWordStore {
        rows: DashMap<i64, BannedWord>,
        next_id: AtomicI64,
    }

    impl MockWordStore {
        fn new() -> Self {
            Self {
                rows: DashMap::new(),
                next_id: AtomicI64::new(1),
            }
        }
    }

    #[async_trait]
    impl WordStore for MockWordStore {
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

        async fn all_words(
            &self,
            search: Option<&str>,
        ) -> Result<Vec<BannedWord>, WordFilterError> {
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

    #[tokio::test]
    async fn test_substring_match_is_case_insensitive() {
        let service = WordFilterService::new(MockWordStore::new());

        assert!(service.add_word("seo").await.unwrap());
        assert!(service
            .contains_blocked_word("Great SEO services")
            .await
            .unwrap());
        assert!(!service.contains_blocked_word("design only").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_words_rejected_case_insensitively() {
        let service = WordFilterService::new(MockWordStore::new());

        assert!(service.add_word("seo").await.unwrap());
        assert!(!service.add_word("SEO").await.unwrap());
        assert!(!service.add_word("  seo  ").await.unwrap());
        assert_eq!(service.list_words(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_and_blank_words_rejected() {
        let service = WordFilterService::new(MockWordStore::new());

        assert!(!service.add_word("").await.unwrap());
        assert!(!service.add_word("   ").await.unwrap());
        assert!(service.list_words(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cache_matches_nothing() {
        let service = WordFilterService::new(MockWordStore::new());

        assert!(!service
            .contains_blocked_word("anything at all")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_cache_is_stale_until_reload() {
        let service = WordFilterService::new(MockWordStore::new());

        // Prime the cache while the list is empty.
        assert!(!service.contains_blocked_word("spam").await.unwrap());

        assert!(service.add_word("spam").await.unwrap());

        // Mutation does not invalidate the cache.
        assert!(!service.contains_blocked_word("spam").await.unwrap());

        assert_eq!(service.reload().await.unwrap(), 1);
        assert!(service.contains_blocked_word("spam").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_words_search_filters_but_cache_stays_complete() {
        let service = WordFilterService::new(MockWordStore::new());

        assert!(service.add_word("casino").await.unwrap());
        assert!(service.add_word("viagra").await.unwrap());

        let filtered = service.list_words(Some("cas")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].word, "casino");

        // Even after a filtered listing, the cache covers the whole table.
        assert!(service.contains_blocked_word("VIAGRA deals").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_missing_word_returns_false() {
        let service = WordFilterService::new(MockWordStore::new());

        assert!(service.add_word("seo").await.unwrap());
        assert!(!service.remove_word(999).await.unwrap());

        let words = service.list_words(None).await.unwrap();
        assert_eq!(words.len(), 1);

        assert!(service.remove_word(words[0].id).await.unwrap());
        service.reload().await.unwrap();
        assert!(!service.contains_blocked_word("seo").await.unwrap());
    }
}
