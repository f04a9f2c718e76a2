//! # Domain Types
//!
//! Common data structures shared by the pipeline, the cache, and the command handlers.

use serde::Deserialize;
use std::fmt;

/// Upstream identifier of a story.
pub type StoryId = u64;

/// A single story as returned by the upstream item endpoint.
/// Never mutated once fetched.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Story {
    pub id: StoryId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String, // Empty for Ask HN / text posts
    #[serde(default)]
    pub score: i64,
}

/// One rendered entry of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    id: StoryId,
    score: i64,
    title: String,
    url: String,
    discussion: String,
}

impl ReportLine {
    /// Builds the line for `story`, linking the discussion page under `discussion_prefix`.
    pub fn new(story: &Story, discussion_prefix: &str) -> Self {
        Self {
            id: story.id,
            score: story.score,
            title: html_escape::encode_text(&story.title).into_owned(),
            url: story.url.clone(),
            discussion: format!("{}{}", discussion_prefix, story.id),
        }
    }

    pub fn id(&self) -> StoryId {
        self.id
    }

    pub fn score(&self) -> i64 {
        self.score
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}\n\tURL: {}\n\tDiscussion: {}\n",
            self.title, self.url, self.discussion
        )
    }
}
