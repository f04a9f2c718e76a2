//! # News Command
//!
//! Handles `.news [n]`: the n highest-scored stories currently in the cache.

use crate::application::aggregator::best_of_k;
use crate::application::cache::StoryCache;
use crate::domain::config::NewsConfig;
use crate::domain::traits::ChatProvider;
use anyhow::Result;

use super::parse_bounded;

pub async fn handle_news(
    config: &NewsConfig,
    cache: &StoryCache,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let text = news_report(config, cache, args).await;
    chat.send_message(&text).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

pub async fn news_report(config: &NewsConfig, cache: &StoryCache, args: &str) -> String {
    let k = match parse_bounded(
        args,
        "news n",
        config.news_default as u64,
        config.news_max as u64,
    ) {
        Ok(k) => k as usize,
        Err(e) => return e.to_string(),
    };
    let candidates = cache.snapshot().await;
    best_of_k(candidates, k, &config.discussion_prefix).render()
}
