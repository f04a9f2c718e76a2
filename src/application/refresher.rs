//! # Cache Refresher
//!
//! Background task that keeps the story cache warm: on every tick it pulls the
//! full top-story list, runs it through the pipeline without a deadline, and
//! publishes the selected stories.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::application::cache::CacheWriter;
use crate::application::pipeline::{PipelineConfig, WorkerEvent, run_pipeline};
use crate::domain::error::NewsError;
use crate::domain::traits::StoryFetcher;
use crate::strings::messages;

pub struct CacheRefresher {
    fetcher: Arc<dyn StoryFetcher>,
    writer: CacheWriter,
    config: PipelineConfig,
    interval: Duration,
    iteration: u64,
}

/// `tokio::time::interval` panics on a zero period.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

impl CacheRefresher {
    pub fn new(
        fetcher: Arc<dyn StoryFetcher>,
        writer: CacheWriter,
        config: PipelineConfig,
        interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            writer,
            config,
            interval: interval.max(MIN_INTERVAL),
            iteration: 0,
        }
    }

    /// Runs forever. The first refresh happens immediately.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.iteration += 1;
            tracing::info!("Cache refresh iteration: {}", self.iteration);
            match self.refresh_once().await {
                Ok(count) => tracing::info!("Cache refresh published {} stories", count),
                Err(e) => tracing::warn!("{}", messages::refresh_failed(&e.to_string())),
            }
        }
    }

    /// One full cycle. Fails only when the top-story list cannot be fetched.
    pub async fn refresh_once(&mut self) -> Result<usize, NewsError> {
        let ids = self.fetcher.top_story_ids().await?;
        tracing::debug!("Refreshing cache from {} story IDs", ids.len());

        // Never raised: a refresh runs to completion
        let (_abort_tx, abort_rx) = watch::channel(false);
        let mut stream = run_pipeline(ids, self.fetcher.clone(), self.config, abort_rx);

        let worker_count = self.config.worker_count.max(1);
        let mut finished = 0usize;
        let mut stories = Vec::new();
        while finished < worker_count {
            match stream.recv().await {
                Some(WorkerEvent::Story(story)) => stories.push(story),
                Some(WorkerEvent::Done(_)) => finished += 1,
                None => break,
            }
        }

        let count = stories.len();
        self.writer.publish(stories).await;
        Ok(count)
    }
}
