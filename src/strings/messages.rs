//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes report headers and summaries, error messages, and startup logs.

use std::time::Duration;

pub fn move_to_channels(channels: &[String]) -> String {
    format!(
        "Please kindly move to {} first and then talk to me again, thank you!",
        channels.join(" or ")
    )
}

// Live top news (deadline-bounded)
pub fn top_header(threshold: i64, timeout: Duration) -> String {
    format!(
        "Delivering news with score >= {threshold} (timeout {}s)...\n",
        timeout.as_secs()
    )
}

pub fn top_summary(scanned: usize, selected: usize, threshold: i64, elapsed: Duration) -> String {
    format!(
        "All done. I scanned {scanned} articles, selected {selected} with score >= {threshold} \
         in {:.1}s.\n",
        elapsed.as_secs_f64()
    )
}

pub fn top_timed_out(timeout: Duration, selected: usize, threshold: i64) -> String {
    format!(
        "Timed out after {}s, delivering the {selected} articles with score >= {threshold} \
         found so far.\n",
        timeout.as_secs()
    )
}

// Cached news (best-of-k)
pub fn news_header(k: usize) -> String {
    format!("Delivering top {k} news...\n")
}

pub fn news_summary(scanned: usize, selected: usize, min: i64, max: i64) -> String {
    format!(
        "All done. I scanned {scanned} articles, selected {selected} top articles \
         sorted with score(min:{min}, max:{max}).\n"
    )
}

pub fn news_empty(scanned: usize) -> String {
    format!("All done. I scanned {scanned} articles, nothing to deliver yet.\n")
}

pub fn upstream_error(err: &str) -> String {
    format!("error: {err}")
}

pub fn status_msg(
    cached: usize,
    refreshed_at: &str,
    workers: usize,
    threshold: i64,
    interval_minutes: u64,
) -> String {
    format!(
        "**📰 Status**\n\
         * cached stories: {cached}\n\
         * last refresh: {refreshed_at}\n\
         * workers: {workers}\n\
         * score threshold: {threshold}\n\
         * refresh interval: {interval_minutes} min\n"
    )
}

pub const NEVER_REFRESHED: &str = "never";
pub const STOCK_USAGE: &str = "Usage: `.stock <ticker>`";

pub fn unknown_quote_format(symbol: &str) -> String {
    format!("unknown response format (symbol was \"{symbol}\")")
}

pub fn quote(name: &str, symbol: &str, price: &str) -> String {
    format!("{name} ({symbol}) is trading at ${price}")
}

// Logs
pub const CONFIG_READ_ERROR: &str = "Failed to read config file";
pub const CONFIG_PARSE_ERROR: &str = "Failed to parse YAML";
pub const ZERO_REFRESH_INTERVAL: &str = "news.refresh_interval_minutes must be at least 1";

pub fn config_loaded(user: &str) -> String {
    format!("Loaded configuration for user: {user}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub fn refresh_failed(err: &str) -> String {
    format!("Cache refresh failed, retrying next tick: {err}")
}
