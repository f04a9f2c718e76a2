//! Test doubles for the domain traits.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::error::NewsError;
use crate::domain::traits::{ChatProvider, QuoteProvider, StoryFetcher};
use crate::domain::types::{Story, StoryId};

/// Serves stories from a fixed score table. Unknown IDs fail like a missing item.
#[derive(Clone, Default)]
pub struct FixtureFetcher {
    stories: BTreeMap<StoryId, Story>,
    delay: Duration,
    slow: HashSet<StoryId>,
    slow_delay: Duration,
    listing_delay: Duration,
    fail_listing: bool,
}

impl FixtureFetcher {
    pub fn with_scores(scores: Vec<(StoryId, i64)>) -> Self {
        let stories = scores
            .into_iter()
            .map(|(id, score)| (id, story(id, score)))
            .collect();
        Self {
            stories,
            ..Default::default()
        }
    }

    /// IDs [1,2,3,4,5] with scores [100,600,50,900,500]
    pub fn scenario() -> Self {
        Self::with_scores(vec![(1, 100), (2, 600), (3, 50), (4, 900), (5, 500)])
    }

    /// Every fetch takes `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fetches of `ids` take `delay` on top of the base delay.
    pub fn with_slow(mut self, ids: &[StoryId], delay: Duration) -> Self {
        self.slow = ids.iter().copied().collect();
        self.slow_delay = delay;
        self
    }

    /// The top-story listing takes `delay`.
    pub fn with_listing_delay(mut self, delay: Duration) -> Self {
        self.listing_delay = delay;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn ids(&self) -> Vec<StoryId> {
        self.stories.keys().copied().collect()
    }
}

pub fn story(id: StoryId, score: i64) -> Story {
    Story {
        id,
        title: format!("Story {id}"),
        url: format!("https://example.com/{id}"),
        score,
    }
}

#[async_trait]
impl StoryFetcher for FixtureFetcher {
    async fn top_story_ids(&self) -> Result<Vec<StoryId>, NewsError> {
        if !self.listing_delay.is_zero() {
            tokio::time::sleep(self.listing_delay).await;
        }
        if self.fail_listing {
            return Err(NewsError::MissingStory(0));
        }
        Ok(self.ids())
    }

    async fn story(&self, id: StoryId) -> Result<Story, NewsError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.slow.contains(&id) {
            tokio::time::sleep(self.slow_delay).await;
        }
        self.stories
            .get(&id)
            .cloned()
            .ok_or(NewsError::MissingStory(id))
    }
}

/// Records every message sent to it.
#[derive(Clone)]
pub struct RecordingChat {
    room: String,
    pub sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingChat {
    pub fn new(room: &str) -> Self {
        Self {
            room: room.to_string(),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        Ok(format!("$event{}", sent.len()))
    }

    async fn typing(&self, _active: bool) -> Result<(), String> {
        Ok(())
    }

    fn room_id(&self) -> String {
        self.room.clone()
    }
}

pub struct FixedQuote;

#[async_trait]
impl QuoteProvider for FixedQuote {
    async fn quote(&self, symbol: &str) -> String {
        format!("{symbol} is trading at $1.00")
    }
}
