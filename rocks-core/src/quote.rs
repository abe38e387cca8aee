//! Latest-price quotes from Yahoo Finance.
//!
//! Reads the `meta` block of Yahoo's v8 chart API for a one-day range:
//! last regular-market price and the previous close, from which the daily
//! change is derived. Yahoo has no official API and changes its response
//! format without notice, so every missing field is a
//! [`QuoteError::ResponseFormatChanged`] rather than a panic.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::directory::{Listing, SymbolDirectory};

/// Errors from resolving or fetching a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("'{0}' is not in the filtered universe")]
    UnknownSymbol(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("quote error: {0}")]
    Other(String),
}

/// Last price and the move since the previous close.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub currency: Option<String>,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    /// Daily change in percent (1.5 means +1.5%).
    pub change_pct: f64,
}

impl Quote {
    fn new(symbol: String, currency: Option<String>, price: f64, previous_close: f64) -> Self {
        let change = price - previous_close;
        let change_pct = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };
        Self {
            symbol,
            currency,
            price,
            previous_close,
            change,
            change_pct,
        }
    }
}

/// Source of live quotes. Implemented by [`YahooQuoteProvider`]; tests
/// substitute a canned provider.
pub trait QuoteProvider {
    fn name(&self) -> &str;
    fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError>;
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    currency: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

/// Yahoo Finance quote provider (blocking).
pub struct YahooQuoteProvider {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooQuoteProvider {
    pub fn new() -> Result<Self, QuoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| QuoteError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(symbol: &str) -> String {
        format!("https://query2.finance.yahoo.com/v8/finance/chart/{symbol}?range=1d&interval=1d")
    }

    fn parse_response(symbol: &str, body: &str) -> Result<Quote, QuoteError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            QuoteError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => QuoteError::SymbolNotFound(symbol.to_string()),
            Some(err) => {
                QuoteError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => QuoteError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let meta = result
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::ResponseFormatChanged("result array is empty".into()))?
            .meta;

        let price = meta
            .regular_market_price
            .ok_or_else(|| QuoteError::ResponseFormatChanged("no regularMarketPrice".into()))?;
        let previous_close = meta
            .previous_close
            .or(meta.chart_previous_close)
            .ok_or_else(|| QuoteError::ResponseFormatChanged("no previous close".into()))?;

        Ok(Quote::new(
            meta.symbol.unwrap_or_else(|| symbol.to_string()),
            meta.currency,
            price,
            previous_close,
        ))
    }
}

impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let url = Self::chart_url(symbol);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
            }
            debug!(symbol, attempt, "fetching quote");

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(QuoteError::SymbolNotFound(symbol.to_string()));
                    }
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(QuoteError::RateLimited);
                        continue;
                    }
                    if !status.is_success() {
                        last_error = Some(QuoteError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }
                    let body = resp
                        .text()
                        .map_err(|e| QuoteError::NetworkUnreachable(e.to_string()))?;
                    return Self::parse_response(symbol, &body);
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(QuoteError::NetworkUnreachable(e.to_string()));
                }
                Err(e) => return Err(QuoteError::NetworkUnreachable(e.to_string())),
            }
        }

        Err(last_error.unwrap_or_else(|| QuoteError::Other("max retries exceeded".into())))
    }
}

/// Resolve `ticker` against the filtered universe, then fetch its quote.
///
/// Tickers outside the universe are rejected before any request is made.
pub fn quote_listing<'a>(
    directory: &'a SymbolDirectory,
    provider: &dyn QuoteProvider,
    ticker: &str,
) -> Result<(&'a Listing, Quote), QuoteError> {
    let listing = directory
        .get(ticker)
        .ok_or_else(|| QuoteError::UnknownSymbol(ticker.trim().to_string()))?;
    let quote = provider.fetch_quote(&listing.symbol)?;
    Ok((listing, quote))
}
