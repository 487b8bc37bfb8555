//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance today,
//! anything bar-shaped tomorrow) so the cache layer and CLI never talk to a
//! concrete HTTP client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily OHLCV bar from a data provider (before validation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("ticker not found: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("parquet I/O error: {0}")]
    ParquetError(String),

    #[error("no cached data for asset '{asset}' — run `download {asset}` first")]
    NoCachedData { asset: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for data providers.
///
/// Implementations handle the specifics of fetching bars from a particular
/// source. The cache layer sits above this trait — providers don't know
/// about the cache.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a ticker over a date range (inclusive).
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError>;
}
