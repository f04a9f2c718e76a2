//! # Aggregator
//!
//! Turns pipeline output into reports. Two selection policies:
//! - `collect_until_deadline`: everything the live pipeline yields until all workers
//!   finished or the timeout fired (partial result, not an error).
//! - `best_of_k`: the k highest-scored stories of an already materialized set.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::application::pipeline::{PipelineConfig, WorkerEvent};
use crate::application::rank_queue::RankQueue;
use crate::domain::types::{ReportLine, Story};
use crate::strings::messages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every worker sent its sentinel
    Completed,
    TimedOut,
}

/// Result of the deadline-bounded policy.
#[derive(Debug, Clone)]
pub struct DeadlineReport {
    pub lines: Vec<ReportLine>,
    /// Stories fetched by workers that finished
    pub scanned: usize,
    pub threshold: i64,
    pub timeout: Duration,
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl DeadlineReport {
    pub fn selected(&self) -> usize {
        self.lines.len()
    }

    pub fn render(&self) -> String {
        let mut res = messages::top_header(self.threshold, self.timeout);
        for line in &self.lines {
            res.push_str(&line.to_string());
        }
        match self.outcome {
            Outcome::Completed => res.push_str(&messages::top_summary(
                self.scanned,
                self.selected(),
                self.threshold,
                self.elapsed,
            )),
            Outcome::TimedOut => res.push_str(&messages::top_timed_out(
                self.timeout,
                self.selected(),
                self.threshold,
            )),
        }
        res
    }
}

/// Consumes the merged stream until `config.worker_count` sentinels arrived or `timeout` elapsed.
/// On timeout the abort flag is raised so the remaining workers stop.
pub async fn collect_until_deadline(
    mut stream: mpsc::Receiver<WorkerEvent>,
    config: PipelineConfig,
    timeout: Duration,
    discussion_prefix: &str,
    abort: &watch::Sender<bool>,
) -> DeadlineReport {
    let start = Instant::now();
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let worker_count = config.worker_count.max(1);
    let mut lines = Vec::new();
    let mut finished = 0usize;
    let mut scanned = 0usize;
    let mut outcome = Outcome::Completed;

    while finished < worker_count {
        tokio::select! {
            biased;
            _ = &mut deadline => {
                tracing::info!(
                    "Deadline of {:?} hit with {}/{} workers finished",
                    timeout,
                    finished,
                    worker_count
                );
                let _ = abort.send(true);
                outcome = Outcome::TimedOut;
                break;
            }
            event = stream.recv() => match event {
                Some(WorkerEvent::Story(story)) => {
                    let line = ReportLine::new(&story, discussion_prefix);
                    tracing::debug!("Selected story {} with score {}", line.id(), line.score());
                    lines.push(line);
                }
                Some(WorkerEvent::Done(summary)) => {
                    finished += 1;
                    scanned += summary.scanned;
                    tracing::debug!(
                        "Worker finished ({}/{}): {} stories, mean roundtrip {:?}",
                        finished,
                        worker_count,
                        summary.scanned,
                        summary.mean_roundtrip
                    );
                }
                None => {
                    tracing::warn!(
                        "Story stream closed after {}/{} sentinels",
                        finished,
                        worker_count
                    );
                    break;
                }
            },
        }
    }

    DeadlineReport {
        lines,
        scanned,
        threshold: config.score_threshold,
        timeout,
        elapsed: start.elapsed(),
        outcome,
    }
}

/// Result of the best-of-k policy.
#[derive(Debug, Clone)]
pub struct BestOfReport {
    /// Highest score first
    pub lines: Vec<ReportLine>,
    pub scanned: usize,
    /// (min, max) of the selected scores
    pub score_range: Option<(i64, i64)>,
}

impl BestOfReport {
    pub fn selected(&self) -> usize {
        self.lines.len()
    }

    pub fn render(&self) -> String {
        let mut res = messages::news_header(self.selected());
        for line in &self.lines {
            res.push_str(&line.to_string());
        }
        match self.score_range {
            Some((min, max)) => res.push_str(&messages::news_summary(
                self.scanned,
                self.selected(),
                min,
                max,
            )),
            None => res.push_str(&messages::news_empty(self.scanned)),
        }
        res
    }
}

/// Picks the `k` highest-scored candidates. `k` larger than the candidate count yields them all.
pub fn best_of_k(candidates: Vec<Story>, k: usize, discussion_prefix: &str) -> BestOfReport {
    let scanned = candidates.len();
    let mut queue: RankQueue = candidates.into_iter().collect();
    tracing::debug!("Ranking {} cached stories for the top {}", queue.len(), k);

    let mut lines = Vec::with_capacity(k.min(scanned));
    let mut score_range: Option<(i64, i64)> = None;
    while lines.len() < k {
        let Some(story) = queue.pop() else {
            break;
        };
        score_range = Some(match score_range {
            Some((min, max)) => (min.min(story.score), max.max(story.score)),
            None => (story.score, story.score),
        });
        lines.push(ReportLine::new(&story, discussion_prefix));
    }

    BestOfReport {
        lines,
        scanned,
        score_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::run_pipeline;
    use crate::testing::{FixtureFetcher, story};
    use std::sync::Arc;

    const PREFIX: &str = "https://news.ycombinator.com/item?id=";

    fn config(worker_count: usize) -> PipelineConfig {
        PipelineConfig {
            worker_count,
            score_threshold: 500,
        }
    }

    fn scenario_stories() -> Vec<Story> {
        [(1, 100), (2, 600), (3, 50), (4, 900), (5, 500)]
            .into_iter()
            .map(|(id, score)| story(id, score))
            .collect()
    }

    #[tokio::test]
    async fn test_deadline_collects_everything_in_time() {
        let fetcher = FixtureFetcher::scenario();
        let (abort_tx, abort_rx) = watch::channel(false);
        let stream = run_pipeline(fetcher.ids(), Arc::new(fetcher), config(1), abort_rx);

        let report =
            collect_until_deadline(stream, config(1), Duration::from_secs(60), PREFIX, &abort_tx)
                .await;

        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.selected(), 3);
        assert_eq!(report.scanned, 5);
        let mut ids: Vec<u64> = report.lines.iter().map(|l| l.id()).collect();
        ids.sort();
        assert_eq!(ids, vec![2, 4, 5]);
        assert!(!*abort_tx.borrow());

        let text = report.render();
        assert!(text.contains("I scanned 5 articles, selected 3 with score >= 500"));
        assert!(text.contains("Discussion: https://news.ycombinator.com/item?id=4"));
        assert!(!text.contains("Timed out"));
    }

    #[tokio::test]
    async fn test_deadline_many_workers() {
        let fetcher = FixtureFetcher::scenario();
        let (abort_tx, abort_rx) = watch::channel(false);
        let stream = run_pipeline(fetcher.ids(), Arc::new(fetcher), config(100), abort_rx);

        let report =
            collect_until_deadline(stream, config(100), Duration::from_secs(60), PREFIX, &abort_tx)
                .await;
        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.selected(), 3);
        assert_eq!(report.scanned, 5);
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_result() {
        // Story 4 hangs far past the deadline; 2 and 5 arrive in time
        let fetcher = FixtureFetcher::scenario().with_slow(&[4], Duration::from_secs(30));
        let (abort_tx, abort_rx) = watch::channel(false);
        let stream = run_pipeline(fetcher.ids(), Arc::new(fetcher), config(5), abort_rx);

        let report = collect_until_deadline(
            stream,
            config(5),
            Duration::from_millis(500),
            PREFIX,
            &abort_tx,
        )
        .await;

        assert_eq!(report.outcome, Outcome::TimedOut);
        assert!(report.elapsed < Duration::from_secs(5));
        let mut ids: Vec<u64> = report.lines.iter().map(|l| l.id()).collect();
        ids.sort();
        assert_eq!(ids, vec![2, 5]);
        assert!(*abort_tx.borrow());

        let text = report.render();
        assert!(text.contains("Timed out after 0s"));
        assert!(text.contains("the 2 articles"));
        assert!(!text.contains("All done"));
    }

    #[tokio::test]
    async fn test_deadline_empty_input() {
        let fetcher = FixtureFetcher::scenario();
        let (abort_tx, abort_rx) = watch::channel(false);
        let stream = run_pipeline(Vec::new(), Arc::new(fetcher), config(4), abort_rx);

        let report =
            collect_until_deadline(stream, config(4), Duration::from_secs(5), PREFIX, &abort_tx)
                .await;
        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.selected(), 0);
        assert_eq!(report.scanned, 0);
    }

    #[test]
    fn test_best_of_k_scenario() {
        let report = best_of_k(scenario_stories(), 2, PREFIX);
        let ids: Vec<u64> = report.lines.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(report.score_range, Some((600, 900)));
        assert_eq!(report.scanned, 5);

        let text = report.render();
        assert!(text.starts_with("Delivering top 2 news...\n"));
        assert!(text.contains("selected 2 top articles sorted with score(min:600, max:900)"));
    }

    #[test]
    fn test_best_of_k_clamps_to_candidates() {
        let report = best_of_k(scenario_stories(), 50, PREFIX);
        assert_eq!(report.selected(), 5);
        let scores: Vec<i64> = report.lines.iter().map(|l| l.score()).collect();
        assert_eq!(scores, vec![900, 600, 500, 100, 50]);
        assert_eq!(report.score_range, Some((50, 900)));
    }

    #[test]
    fn test_best_of_k_is_true_top_k() {
        let candidates: Vec<Story> = (1..=60)
            .map(|id| story(id, (id as i64 * 7919) % 613))
            .collect();
        for k in [0, 1, 3, 17, 60] {
            let report = best_of_k(candidates.clone(), k, PREFIX);
            assert_eq!(report.selected(), k);
            let chosen: Vec<u64> = report.lines.iter().map(|l| l.id()).collect();
            let lowest_chosen = report.lines.iter().map(|l| l.score()).min();
            if let Some(lowest) = lowest_chosen {
                for c in candidates.iter().filter(|c| !chosen.contains(&c.id)) {
                    assert!(c.score <= lowest);
                }
            }
        }
    }

    #[test]
    fn test_best_of_k_empty_cache() {
        let report = best_of_k(Vec::new(), 3, PREFIX);
        assert_eq!(report.selected(), 0);
        assert_eq!(report.score_range, None);
        assert!(report.render().contains("nothing to deliver yet"));
    }
}
