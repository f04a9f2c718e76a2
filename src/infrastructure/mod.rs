//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, StoryFetcher, QuoteProvider).

pub mod hackernews;
pub mod matrix;
pub mod stock;
