//! Data acquisition and caching.

pub mod cache;
pub mod provider;
pub mod universe;
pub mod yahoo;

pub use cache::{CacheMeta, ParquetCache};
pub use provider::{DataError, DataProvider, RawBar};
pub use universe::{provider_ticker, Asset, DEFAULT_UNIVERSE};
pub use yahoo::YahooProvider;

use crate::domain::Bar;

/// Promote raw provider bars into domain bars.
pub fn to_bars(raw: Vec<RawBar>) -> Vec<Bar> {
    raw.into_iter()
        .map(|b| Bar {
            date: b.date,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
            adj_close: b.adj_close,
        })
        .collect()
}
