//! # Story Pipeline
//!
//! Fan-out/fan-in fetch pipeline:
//! - `generate`: feeds story IDs into a channel, in order
//! - `spawn_workers`: N workers share that channel, fetch each story, keep the ones above the threshold
//! - `merge`: relays every worker's output into one stream
//!
//! Each worker ends its output with exactly one `WorkerEvent::Done`.
//! Consumers must count `worker_count` of them before treating the stream as exhausted.
//! Workers watch an abort signal and stop early once it is raised.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::Instant;

use crate::domain::config::NewsConfig;
use crate::domain::traits::StoryFetcher;
use crate::domain::types::{Story, StoryId};

const CHANNEL_CAPACITY: usize = 1;

/// Pipeline tuning, usually taken from `NewsConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub worker_count: usize,
    pub score_threshold: i64,
}

impl From<&NewsConfig> for PipelineConfig {
    fn from(config: &NewsConfig) -> Self {
        Self {
            worker_count: config.worker_count,
            score_threshold: config.score_threshold,
        }
    }
}

/// What a worker reports at the end of its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    /// IDs pulled from the input, including failed fetches
    pub scanned: usize,
    pub mean_roundtrip: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Story(Story),
    /// Terminal sentinel, always the last event of a worker
    Done(WorkerSummary),
}

/// Emits every ID exactly once, in input order, then closes.
pub fn generate(ids: Vec<StoryId>) -> mpsc::Receiver<StoryId> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(async move {
        for id in ids {
            if tx.send(id).await.is_err() {
                // All workers are gone
                break;
            }
        }
    });
    rx
}

/// Starts `config.worker_count` workers (at least one) pulling from `input`.
/// Returns one output channel per worker.
pub fn spawn_workers(
    input: mpsc::Receiver<StoryId>,
    fetcher: Arc<dyn StoryFetcher>,
    config: PipelineConfig,
    abort: watch::Receiver<bool>,
) -> Vec<mpsc::Receiver<WorkerEvent>> {
    let input = Arc::new(Mutex::new(input));
    (0..config.worker_count.max(1))
        .map(|worker| {
            let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
            tokio::spawn(run_worker(
                worker,
                input.clone(),
                fetcher.clone(),
                config.score_threshold,
                abort.clone(),
                tx,
            ));
            rx
        })
        .collect()
}

async fn run_worker(
    worker: usize,
    input: Arc<Mutex<mpsc::Receiver<StoryId>>>,
    fetcher: Arc<dyn StoryFetcher>,
    score_threshold: i64,
    mut abort: watch::Receiver<bool>,
    out: mpsc::Sender<WorkerEvent>,
) {
    let mut total = Duration::ZERO;
    let mut scanned = 0usize;

    loop {
        if *abort.borrow() {
            break;
        }

        // Hold the lock only while waiting for the next ID
        let next = tokio::select! {
            id = async { input.lock().await.recv().await } => id,
            _ = aborted(&mut abort) => None,
        };
        let Some(id) = next else {
            break;
        };

        let start = Instant::now();
        let fetched = tokio::select! {
            res = fetcher.story(id) => Some(res),
            _ = aborted(&mut abort) => None,
        };
        let Some(fetched) = fetched else {
            break;
        };
        total += start.elapsed();
        scanned += 1;

        match fetched {
            Ok(story) if story.score >= score_threshold => {
                if out.send(WorkerEvent::Story(story)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Worker {} dropping story {}: {}", worker, id, e);
            }
        }
    }

    let mean_roundtrip = if scanned > 0 {
        total / scanned as u32
    } else {
        Duration::ZERO
    };
    tracing::debug!(
        "Worker {} report: {} stories, average roundtrip is {:?}",
        worker,
        scanned,
        mean_roundtrip
    );

    let _ = out
        .send(WorkerEvent::Done(WorkerSummary {
            scanned,
            mean_roundtrip,
        }))
        .await;
}

/// Resolves once the abort flag is raised. Never resolves if the sender is gone without raising it.
async fn aborted(abort: &mut watch::Receiver<bool>) {
    let closed = abort.wait_for(|raised| *raised).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

/// Relays every input channel into one. The output closes once all relays finished.
pub fn merge(inputs: Vec<mpsc::Receiver<WorkerEvent>>) -> mpsc::Receiver<WorkerEvent> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    for mut input in inputs {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(event) = input.recv().await {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
    }
    // Relays now own the only senders
    drop(tx);
    rx
}

/// generate → spawn_workers → merge
pub fn run_pipeline(
    ids: Vec<StoryId>,
    fetcher: Arc<dyn StoryFetcher>,
    config: PipelineConfig,
    abort: watch::Receiver<bool>,
) -> mpsc::Receiver<WorkerEvent> {
    merge(spawn_workers(generate(ids), fetcher, config, abort))
}
