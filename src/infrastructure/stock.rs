//! # Stock Quotes
//!
//! `QuoteProvider` over a CSV quote endpoint returning one row of
//! `name, symbol, last price, open, previous close`.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::error::NewsError;
use crate::domain::traits::QuoteProvider;
use crate::strings::messages;

pub struct StockClient {
    http: reqwest::Client,
    endpoint: String,
}

impl StockClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, NewsError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    async fn fetch_csv(&self, symbol: &str) -> Result<String, NewsError> {
        let url = self.endpoint.replace("{symbol}", symbol);
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl QuoteProvider for StockClient {
    async fn quote(&self, symbol: &str) -> String {
        let symbol = symbol.to_uppercase();
        match self.fetch_csv(&symbol).await {
            Ok(body) => format_quote(&body, &symbol),
            Err(e) => messages::upstream_error(&e.to_string()),
        }
    }
}

/// Renders the first CSV row, or an "unknown response format" notice.
pub fn format_quote(body: &str, symbol: &str) -> String {
    let row = body.lines().next().map(split_csv_row).unwrap_or_default();
    if row.len() == 5 {
        messages::quote(&row[0], &row[1], &row[2])
    } else {
        messages::unknown_quote_format(symbol)
    }
}

/// Splits one CSV line. Handles quoted fields and `""` escapes.
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
