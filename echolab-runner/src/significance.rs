//! Significance evaluation over a simulated distribution.
//!
//! Deterministic given the input array: summary percentiles plus the
//! two-sided empirical p-value
//!
//! ```text
//! p = clamp(2 × min(P[x ≤ 0], P[x ≥ 0]), 0, 1)
//! ```
//!
//! Outcomes exactly equal to zero are counted in *both* tails. The doubled
//! minimum can therefore reach past 1 before the clamp; the over-count is a
//! deliberate conservative bias, documented rather than corrected. The
//! clamp also gives the degenerate all-zero distribution its documented
//! p-value of 1.

use serde::{Deserialize, Serialize};

/// Summary statistics of a simulated percentage-change distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionSummary {
    pub mean: f64,
    pub median: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 95th percentile.
    pub p95: f64,
    /// Two-sided empirical p-value.
    pub p_value: f64,
}

/// Summarize a simulated percentage-change array.
///
/// The array must be non-empty; the entrypoint guarantees that.
pub fn summarize(pct_changes: &[f64]) -> DistributionSummary {
    let n = pct_changes.len();
    debug_assert!(n > 0, "cannot summarize an empty distribution");

    let mean = pct_changes.iter().sum::<f64>() / n as f64;

    let mut sorted = pct_changes.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    DistributionSummary {
        mean,
        median: percentile_sorted(&sorted, 50.0),
        p5: percentile_sorted(&sorted, 5.0),
        p95: percentile_sorted(&sorted, 95.0),
        p_value: two_sided_p(pct_changes),
    }
}

/// Two-sided empirical p-value with the zero-in-both-tails convention.
pub fn two_sided_p(pct_changes: &[f64]) -> f64 {
    let n = pct_changes.len();
    if n == 0 {
        return 1.0;
    }
    let le = pct_changes.iter().filter(|&&x| x <= 0.0).count() as f64;
    let ge = pct_changes.iter().filter(|&&x| x >= 0.0).count() as f64;
    (2.0 * (le.min(ge)) / n as f64).min(1.0)
}

/// Percentile of a sorted slice using linear interpolation.
pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
