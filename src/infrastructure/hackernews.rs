//! # Hacker News Client
//!
//! Implements `StoryFetcher` against the Hacker News Firebase API:
//! - `{base}/topstories.json`: up to 500 IDs, best first
//! - `{base}/item/{id}.json`: one item, or `null` when it does not exist

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::error::NewsError;
use crate::domain::traits::StoryFetcher;
use crate::domain::types::{Story, StoryId};

pub struct HackerNewsClient {
    http: reqwest::Client,
    base: String,
}

impl HackerNewsClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, NewsError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("newsbot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn top_stories_url(&self) -> String {
        format!("{}/topstories.json", self.base)
    }

    fn item_url(&self, id: StoryId) -> String {
        format!("{}/item/{}.json", self.base, id)
    }
}

#[async_trait]
impl StoryFetcher for HackerNewsClient {
    async fn top_story_ids(&self) -> Result<Vec<StoryId>, NewsError> {
        let ids = self
            .http
            .get(self.top_stories_url())
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<StoryId>>()
            .await?;
        Ok(ids)
    }

    async fn story(&self, id: StoryId) -> Result<Story, NewsError> {
        let item = self
            .http
            .get(self.item_url(id))
            .send()
            .await?
            .error_for_status()?
            .json::<Option<Story>>()
            .await?;
        item.ok_or(NewsError::MissingStory(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = HackerNewsClient::new(
            "https://hacker-news.firebaseio.com/v0/",
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(
            client.top_stories_url(),
            "https://hacker-news.firebaseio.com/v0/topstories.json"
        );
        assert_eq!(
            client.item_url(8863),
            "https://hacker-news.firebaseio.com/v0/item/8863.json"
        );
    }

    #[test]
    fn test_null_item_is_none() {
        let item: Option<Story> = serde_json::from_str("null").unwrap();
        assert!(item.is_none());
    }
}
