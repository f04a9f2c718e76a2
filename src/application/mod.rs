//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the story pipeline, the report policies, the story cache and its refresher, and command routing.

pub mod aggregator;
pub mod cache;
pub mod pipeline;
pub mod rank_queue;
pub mod refresher;
pub mod router;
