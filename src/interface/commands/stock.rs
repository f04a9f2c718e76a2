//! # Stock Command
//!
//! Handles `.stock <ticker>`.

use crate::domain::traits::{ChatProvider, QuoteProvider};
use anyhow::Result;

pub async fn handle_stock(
    quotes: &dyn QuoteProvider,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let text = match parts.as_slice() {
        [symbol] => quotes.quote(symbol).await,
        _ => crate::strings::messages::STOCK_USAGE.to_string(),
    };
    chat.send_message(&text).await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
