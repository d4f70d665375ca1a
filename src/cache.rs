//! Read-model query cache
//!
//! A small cache over externally owned read-model views ("book by id",
//! "continue reading"), keyed by logical string keys. The session never
//! writes progress into the cache; it only issues refresh requests so stale
//! progress is not shown when the user navigates back. Refreshes match by
//! key prefix and notify subscribers over a broadcast channel -- whoever
//! populated an entry is responsible for refetching it.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Cache key prefix for the book overview query, scoped per book
pub fn book_by_id_key(book_id: &str) -> String {
    format!("bookById:{}", book_id)
}

/// Cache key prefix for the global continue-reading list
pub const CONTINUE_READING_KEY: &str = "continueReading";

/// A refresh request for all entries matching a key prefix
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    pub prefix: String,
}

#[derive(Debug)]
struct Entry {
    value: Value,
    stale: bool,
}

/// Prefix-refreshable query cache
pub struct QueryCache {
    entries: RwLock<HashMap<String, Entry>>,
    refresh_tx: broadcast::Sender<RefreshRequest>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (refresh_tx, _) = broadcast::channel(64);
        Self {
            entries: RwLock::new(HashMap::new()),
            refresh_tx,
        }
    }

    /// Insert or replace an entry. Freshly inserted entries are not stale.
    pub async fn insert(&self, key: impl Into<String>, value: Value) {
        let mut entries = self.entries.write().await;
        entries.insert(key.into(), Entry { value, stale: false });
    }

    /// Get the cached value for a key, stale or not
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        entries.get(key).map(|e| e.value.clone())
    }

    /// Whether a key exists and is marked stale
    pub async fn is_stale(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries.get(key).map(|e| e.stale).unwrap_or(false)
    }

    /// Mark all entries matching the prefix stale and notify subscribers.
    ///
    /// This is a refresh signal, not a write: values stay readable until the
    /// owner refetches them.
    pub async fn refetch(&self, prefix: &str) {
        let mut entries = self.entries.write().await;
        let mut marked = 0usize;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                marked += 1;
            }
        }
        debug!(prefix, marked, "cache refetch requested");
        // Notify even when nothing matched; the owner may not have populated
        // the entry yet
        let _ = self.refresh_tx.send(RefreshRequest {
            prefix: prefix.to_string(),
        });
    }

    /// Subscribe to refresh requests
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshRequest> {
        self.refresh_tx.subscribe()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared cache handle
pub type SharedCache = Arc<QueryCache>;
