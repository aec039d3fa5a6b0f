//! Time-based cache for processed post lists
//!
//! Each distinct post query (language and inclusion flags) gets its own
//! entry. Entries are immutable once stored and are ignored after the TTL
//! has passed. Concurrent misses are not de-duplicated: every loader
//! writes only the value it computed itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::content::Post;

/// Default time a processed post list stays valid
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Identifies one processed variant of the post list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub lang: String,
    pub include_content: bool,
    pub include_localizations: bool,
}

/// A cached post list and when it was computed
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub posts: Arc<Vec<Post>>,
    pub stored_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// TTL cache shared by all requests of a blog
#[derive(Debug)]
pub struct PostCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl PostCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry for `key`, if any
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Vec<Post>>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| Arc::clone(&entry.posts))
    }

    /// Store a freshly computed list, replacing any previous entry
    pub async fn put(&self, key: CacheKey, posts: Arc<Vec<Post>>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                posts,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        tracing::debug!("Cleared {} post cache entries", count);
    }

    /// Number of stored entries, fresh or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for PostCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
