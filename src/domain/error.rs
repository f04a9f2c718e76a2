//! # Errors
//!
//! Error taxonomy for the news features. Every variant is recovered locally and
//! turned into user-visible text by the command handlers.

use std::num::ParseIntError;

use crate::domain::types::StoryId;

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("story {0} not found upstream")]
    MissingStory(StoryId),

    /// Bad numeric argument. `what` names the argument as the user sees it.
    #[error("{what} parsed error: {source}")]
    InvalidArgument {
        what: &'static str,
        #[source]
        source: ParseIntError,
    },
}
