//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix service, the bridged channels, and the news pipeline.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::strings::messages;

/// Hard upper bound for the `top` timeout, whatever the config says.
pub const TOP_TIMEOUT_CAP_SECS: u64 = 60;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub bridges: HashMap<String, Vec<BridgeEntry>>,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub stock: StockConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("{} ({})", messages::CONFIG_READ_ERROR, path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context(messages::CONFIG_PARSE_ERROR)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.news.refresh_interval_minutes > 0,
            messages::ZERO_REFRESH_INTERVAL
        );
        Ok(())
    }

    /// Matrix rooms the bot serves commands in, collected from all bridges.
    pub fn allowed_channels(&self) -> BTreeSet<String> {
        self.bridges
            .values()
            .flatten()
            .filter(|b| b.service.as_deref() == Some("matrix"))
            .filter_map(|b| b.channel.clone())
            .collect()
    }
}

/// Represents a specific bridge entry connecting a service to a channel.
#[derive(Debug, Deserialize, Clone)]
pub struct BridgeEntry {
    pub service: Option<String>,
    pub channel: Option<String>,
}

/// Configuration for various connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Settings for the story pipeline, the cache refresher and the news commands.
#[derive(Debug, Deserialize, Clone)]
pub struct NewsConfig {
    /// Lower bound (inclusive) of the score to qualify as top news
    #[serde(default = "default_score_threshold")]
    pub score_threshold: i64,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_refresh_minutes")]
    pub refresh_interval_minutes: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_discussion_prefix")]
    pub discussion_prefix: String,
    #[serde(default = "default_news_count")]
    pub news_default: usize,
    #[serde(default = "default_news_max")]
    pub news_max: usize,
    #[serde(default = "default_top_timeout")]
    pub top_default_timeout_secs: u64,
    #[serde(default = "default_top_max_timeout")]
    pub top_max_timeout_secs: u64,
}

impl NewsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_minutes * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn top_max_timeout(&self) -> u64 {
        self.top_max_timeout_secs.min(TOP_TIMEOUT_CAP_SECS)
    }

    pub fn top_default_timeout(&self) -> u64 {
        self.top_default_timeout_secs.min(self.top_max_timeout())
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            worker_count: default_worker_count(),
            refresh_interval_minutes: default_refresh_minutes(),
            request_timeout_secs: default_request_timeout(),
            api_base: default_api_base(),
            discussion_prefix: default_discussion_prefix(),
            news_default: default_news_count(),
            news_max: default_news_max(),
            top_default_timeout_secs: default_top_timeout(),
            top_max_timeout_secs: default_top_max_timeout(),
        }
    }
}

fn default_score_threshold() -> i64 {
    500
}
fn default_worker_count() -> usize {
    100
}
fn default_refresh_minutes() -> u64 {
    15
}
fn default_request_timeout() -> u64 {
    5
}
fn default_api_base() -> String {
    "https://hacker-news.firebaseio.com/v0".to_string()
}
fn default_discussion_prefix() -> String {
    "https://news.ycombinator.com/item?id=".to_string()
}
fn default_news_count() -> usize {
    3
}
fn default_news_max() -> usize {
    5
}
fn default_top_timeout() -> u64 {
    5
}
fn default_top_max_timeout() -> u64 {
    TOP_TIMEOUT_CAP_SECS
}

#[derive(Debug, Deserialize, Clone)]
pub struct StockConfig {
    /// Quote endpoint, `{symbol}` is substituted
    #[serde(default = "default_stock_endpoint")]
    pub endpoint: String,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            endpoint: default_stock_endpoint(),
        }
    }
}

fn default_stock_endpoint() -> String {
    "http://download.finance.yahoo.com/d/quotes.csv?s={symbol}&f=nsl1op&e=.csv".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
services:
  matrix:
    username: newsbot
    password: hunter2
    homeserver: https://matrix.example.org
"#;

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::parse(MINIMAL).unwrap();
        assert_eq!(config.services.matrix.username, "newsbot");
        assert_eq!(config.news.score_threshold, 500);
        assert_eq!(config.news.worker_count, 100);
        assert_eq!(config.news.refresh_interval(), Duration::from_secs(15 * 60));
        assert_eq!(config.news.news_default, 3);
        assert_eq!(config.news.news_max, 5);
        assert_eq!(config.news.top_max_timeout_secs, 60);
        assert!(config.stock.endpoint.contains("{symbol}"));
        assert!(config.allowed_channels().is_empty());
    }

    #[test]
    fn test_allowed_channels_from_bridges() {
        let yaml = format!(
            "{MINIMAL}
bridges:
  random:
    - service: matrix
      channel: \"!random:example.org\"
    - service: irc
      channel: \"#random\"
  test-chamber:
    - service: matrix
      channel: \"!test:example.org\"
news:
  worker_count: 8
  score_threshold: 250
"
        );
        let config = AppConfig::parse(&yaml).unwrap();
        let channels: Vec<String> = config.allowed_channels().into_iter().collect();
        assert_eq!(channels, vec!["!random:example.org", "!test:example.org"]);
        assert_eq!(config.news.worker_count, 8);
        assert_eq!(config.news.score_threshold, 250);
        assert_eq!(config.news.top_default_timeout_secs, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.services.matrix.homeserver, "https://matrix.example.org");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let yaml = format!("{MINIMAL}\nnews:\n  refresh_interval_minutes: 0\n");
        let err = AppConfig::parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("refresh_interval_minutes"));
    }

    #[test]
    fn test_top_timeouts_capped() {
        let yaml = format!(
            "{MINIMAL}\nnews:\n  top_max_timeout_secs: 3600\n  top_default_timeout_secs: 900\n"
        );
        let config = AppConfig::parse(&yaml).unwrap();
        assert_eq!(config.news.top_max_timeout(), 60);
        assert_eq!(config.news.top_default_timeout(), 60);

        let defaults = AppConfig::parse(MINIMAL).unwrap();
        assert_eq!(defaults.news.top_max_timeout(), 60);
        assert_eq!(defaults.news.top_default_timeout(), 5);
    }
}
