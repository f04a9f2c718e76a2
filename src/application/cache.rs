//! # Story Cache
//!
//! In-memory map of story ID to story behind a reader/writer lock.
//! `StoryCache::create` hands out exactly one `CacheWriter` (owned by the refresher)
//! and a cloneable read handle for the command handlers.
//! Entries are replaced in place on refresh and never evicted.

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::types::{Story, StoryId};

#[derive(Default)]
struct CacheInner {
    stories: HashMap<StoryId, Story>,
    refreshed_at: Option<DateTime<Local>>,
}

/// Read-only handle.
#[derive(Clone)]
pub struct StoryCache {
    inner: Arc<RwLock<CacheInner>>,
}

/// The only handle able to mutate the cache. Not `Clone`.
pub struct CacheWriter {
    inner: Arc<RwLock<CacheInner>>,
}

impl StoryCache {
    pub fn create() -> (StoryCache, CacheWriter) {
        let inner = Arc::new(RwLock::new(CacheInner::default()));
        (
            StoryCache {
                inner: inner.clone(),
            },
            CacheWriter { inner },
        )
    }

    /// Copies all cached stories out, so the read lock is released immediately.
    pub async fn snapshot(&self) -> Vec<Story> {
        let guard = self.inner.read().await;
        guard.stories.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.stories.len()
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.inner.read().await.refreshed_at
    }
}

impl CacheWriter {
    /// Inserts or replaces every story, then stamps the refresh time.
    pub async fn publish(&mut self, stories: Vec<Story>) {
        let mut guard = self.inner.write().await;
        for story in stories {
            guard.stories.insert(story.id, story);
        }
        guard.refreshed_at = Some(Local::now());
    }
}
