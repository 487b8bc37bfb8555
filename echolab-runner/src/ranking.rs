//! Indicator ranking by correlation with near-term price impulse.
//!
//! For each indicator column, correlate its first difference against the
//! volatility-normalized one-step price change. |corr| ranks the indicators
//! for display; r² is reported alongside as the share of impulse variance
//! the indicator's movement lines up with. This is a display ranking, not a
//! predictive claim.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use echolab_core::domain::PriceTable;

/// Window for normalizing the price impulse by its rolling volatility.
const IMPULSE_VOL_WINDOW: usize = 20;

/// Correlation score for a single indicator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndicatorScore {
    pub indicator: String,
    pub abs_corr: f64,
    pub r2: f64,
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("score export failed: {0}")]
    Export(String),
}

/// Score every indicator column in the table, sorted by |corr| descending.
///
/// Columns whose difference never overlaps the defined impulse (or has zero
/// variance there) are dropped from the ranking.
pub fn score_indicators(table: &PriceTable) -> Vec<IndicatorScore> {
    let impulse = normalized_impulse(&table.adj_close());

    let mut scores: Vec<IndicatorScore> = table
        .column_names()
        .into_iter()
        .filter_map(|name| {
            let column = table.column(name)?;
            let delta = first_difference(column);
            let corr = pearson(&delta, &impulse)?;
            Some(IndicatorScore {
                indicator: name.to_string(),
                abs_corr: corr.abs(),
                r2: corr * corr,
            })
        })
        .collect();

    scores.sort_by(|a, b| {
        b.abs_corr
            .partial_cmp(&a.abs_corr)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scores
}

/// The top `n` indicators by |corr|.
pub fn top_indicators(scores: &[IndicatorScore], n: usize) -> Vec<&IndicatorScore> {
    scores.iter().take(n).collect()
}

/// Write a score table as CSV (indicator, abs_corr, r2).
pub fn write_scores_csv(scores: &[IndicatorScore], path: &Path) -> Result<(), RankingError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| RankingError::Export(e.to_string()))?;
    for score in scores {
        writer
            .serialize(score)
            .map_err(|e| RankingError::Export(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| RankingError::Export(e.to_string()))?;
    Ok(())
}

/// One-step price change divided by its rolling standard deviation.
fn normalized_impulse(adj_close: &[f64]) -> Vec<f64> {
    let delta = first_difference(adj_close);
    let n = delta.len();
    let mut out = vec![f64::NAN; n];
    if n < IMPULSE_VOL_WINDOW + 1 {
        return out;
    }
    for i in IMPULSE_VOL_WINDOW..n {
        let window = &delta[i + 1 - IMPULSE_VOL_WINDOW..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().sum::<f64>() / IMPULSE_VOL_WINDOW as f64;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (IMPULSE_VOL_WINDOW as f64 - 1.0);
        let std = var.sqrt();
        if std > 0.0 {
            out[i] = delta[i] / std;
        }
    }
    out
}

fn first_difference(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    for i in 1..n {
        out[i] = values[i] - values[i - 1];
    }
    out
}

/// Pearson correlation over positions where both series are finite.
/// `None` when fewer than two overlapping points or either side is constant.
fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(cov / (var_a.sqrt() * var_b.sqrt()))
}
