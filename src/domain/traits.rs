//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (Chat, Story API, Quotes).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::error::NewsError;
use crate::domain::types::{Story, StoryId};

/// Abstract interface for a Chat Provider (e.g., Matrix)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room, returning the event ID
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a typing indicator
    async fn typing(&self, active: bool) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Abstract interface for the upstream story API
#[async_trait]
pub trait StoryFetcher: Send + Sync {
    /// IDs of the current top stories, in upstream rank order
    async fn top_story_ids(&self) -> Result<Vec<StoryId>, NewsError>;

    /// A single story
    async fn story(&self, id: StoryId) -> Result<Story, NewsError>;
}

/// Abstract interface for a stock quote source.
/// Failures are rendered into the returned text.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote(&self, symbol: &str) -> String;
}
