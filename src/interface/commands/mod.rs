//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (.news, .top, .stock, .status, .help).
//! These handlers are invoked by the Router.

pub mod help;
pub mod misc;
pub mod news;
pub mod stock;
pub mod top;

use crate::domain::error::NewsError;

/// Parses the first argument as a number, falling back to `default` and clamping to `max`.
pub fn parse_bounded(
    args: &str,
    what: &'static str,
    default: u64,
    max: u64,
) -> Result<u64, NewsError> {
    match args.split_whitespace().next() {
        None => Ok(default.min(max)),
        Some(raw) => raw
            .parse::<u64>()
            .map(|n| n.min(max))
            .map_err(|source| NewsError::InvalidArgument { what, source }),
    }
}
