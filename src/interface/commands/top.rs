//! # Top Command
//!
//! Handles `.top [seconds]`: runs the live pipeline over the current top stories
//! and reports every story above the score threshold found before the timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::application::aggregator::{DeadlineReport, Outcome, collect_until_deadline};
use crate::application::pipeline::{PipelineConfig, run_pipeline};
use crate::domain::config::NewsConfig;
use crate::domain::traits::{ChatProvider, StoryFetcher};
use crate::strings::messages;
use anyhow::Result;

use super::parse_bounded;

pub async fn handle_top(
    config: &NewsConfig,
    fetcher: Arc<dyn StoryFetcher>,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let _ = chat.typing(true).await;
    let text = top_report(config, fetcher, args).await;
    let _ = chat.typing(false).await;
    chat.send_message(&text).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

/// The whole run, listing included, is bounded by the requested timeout.
pub async fn top_report(config: &NewsConfig, fetcher: Arc<dyn StoryFetcher>, args: &str) -> String {
    let timeout = match parse_bounded(
        args,
        "top timeout",
        config.top_default_timeout(),
        config.top_max_timeout(),
    ) {
        Ok(secs) => Duration::from_secs(secs),
        Err(e) => return e.to_string(),
    };

    let pipeline = PipelineConfig::from(config);
    let start = Instant::now();
    let ids = match tokio::time::timeout(timeout, fetcher.top_story_ids()).await {
        Ok(Ok(ids)) => ids,
        Ok(Err(e)) => {
            tracing::warn!("Fetching top stories failed: {}", e);
            return messages::upstream_error(&e.to_string());
        }
        Err(_) => {
            tracing::info!("Deadline of {:?} hit while listing top stories", timeout);
            let report = DeadlineReport {
                lines: Vec::new(),
                scanned: 0,
                threshold: pipeline.score_threshold,
                timeout,
                elapsed: start.elapsed(),
                outcome: Outcome::TimedOut,
            };
            return report.render();
        }
    };

    let (abort_tx, abort_rx) = watch::channel(false);
    let stream = run_pipeline(ids, fetcher, pipeline, abort_rx);
    let mut report = collect_until_deadline(
        stream,
        pipeline,
        timeout.saturating_sub(start.elapsed()),
        &config.discussion_prefix,
        &abort_tx,
    )
    .await;
    report.timeout = timeout;
    report.elapsed = start.elapsed();

    tracing::info!(
        "Top scan {:?}: {} selected, {} scanned in {:?}",
        report.outcome,
        report.selected(),
        report.scanned,
        report.elapsed
    );
    report.render()
}
