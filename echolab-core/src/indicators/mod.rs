//! Concrete indicator implementations.
//!
//! All indicators implement the `Indicator` trait: bar history in, numeric
//! series out, same length as the input, NaN for every position where the
//! value is undefined (warmup prefix, degenerate windows). They are computed
//! once at table-build time; the simulation layer only reads the resulting
//! columns by name.
//!
//! Unless noted otherwise, price-based indicators run on `adj_close`; ATR and
//! ADX additionally use the high/low range, OBV uses volume.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod volatility;
pub mod zscore;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::BollingerPctB;
pub use ema::Ema;
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::Sma;
pub use volatility::RollingVol;
pub use zscore::ZScore;

use crate::domain::{Bar, PriceTable, TableError};

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. Undefined positions are `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or
/// later. Forward-looking labels are not indicators and live elsewhere.
pub trait Indicator: Send + Sync {
    /// Column name the value series is stored under (e.g. "SMA20", "RSI14").
    fn name(&self) -> &str;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// The production indicator set: SMA5/20, EMA5/20, RSI14, ATR14, OBV,
/// BOLLB20, ADX14, VOL20, Z20.
pub fn standard_set() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Sma::new(5)),
        Box::new(Sma::new(20)),
        Box::new(Ema::new(5)),
        Box::new(Ema::new(20)),
        Box::new(Rsi::new(14)),
        Box::new(Atr::new(14)),
        Box::new(Obv::new()),
        Box::new(BollingerPctB::new(20, 2.0)),
        Box::new(Adx::new(14)),
        Box::new(RollingVol::new(20)),
        Box::new(ZScore::new(20)),
    ]
}

/// Build a simulation-ready table: validate the bar series, attach the
/// standard indicator columns, then drop every row where any column is
/// still undefined. Void bars (NaN prices) are discarded up front.
pub fn standard_table(asset: impl Into<String>, bars: Vec<Bar>) -> Result<PriceTable, TableError> {
    let bars: Vec<Bar> = bars.into_iter().filter(|b| !b.is_void()).collect();
    let mut table = PriceTable::from_bars(asset, bars)?;
    for indicator in standard_set() {
        let values = indicator.compute(table.bars());
        table.insert_column(indicator.name(), values)?;
    }
    Ok(table.drop_undefined())
}

// ─── Rolling-window helpers ─────────────────────────────────────────

/// Rolling mean over `window` values. NaN until the window fills, NaN
/// whenever the window contains a NaN.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window == 0 || n < window {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = slice.iter().sum::<f64>() / window as f64;
    }
    out
}

/// Rolling sample standard deviation (n−1 denominator) over `window` values.
pub(crate) fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window < 2 || n < window {
        return out;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        out[i] = var.sqrt();
    }
    out
}

/// First difference; NaN at position 0 and next to any NaN input.
pub(crate) fn diff(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for i in 1..n {
        out[i] = values[i] - values[i - 1];
    }
    out
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) − 1.0,
/// volume = 1000, adj_close = close.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000,
                adj_close: close,
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-9;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual}"
    );
}
