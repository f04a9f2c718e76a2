//! # Miscellaneous Commands
//!
//! Handles `.status`.

use crate::application::cache::StoryCache;
use crate::domain::config::NewsConfig;
use crate::domain::traits::ChatProvider;
use anyhow::Result;

pub async fn handle_status(
    config: &NewsConfig,
    cache: &StoryCache,
    chat: &impl ChatProvider,
) -> Result<()> {
    let refreshed_at = cache
        .refreshed_at()
        .await
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| crate::strings::messages::NEVER_REFRESHED.to_string());

    let msg = crate::strings::messages::status_msg(
        cache.len().await,
        &refreshed_at,
        config.worker_count,
        config.score_threshold,
        config.refresh_interval_minutes,
    );
    chat.send_message(&msg).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
