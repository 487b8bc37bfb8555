//! Robustness sweep — the p-hacking detector.
//!
//! Reruns the analog → bootstrap → significance pipeline across a ladder of
//! band multipliers and tracks the most extreme (smallest) p-value found.
//! Ladder bands with too few analogs are skipped, not errors — only the
//! base band is load-bearing. A result is flagged `dangerous` when the
//! best p-value clears the significance threshold *and* more than one
//! usable band was actually searched: significance that only appears after
//! searching is an artifact of the search, and the flag says so instead of
//! hiding it.

use serde::{Deserialize, Serialize};

use echolab_core::rng::SeedHierarchy;

use crate::analog::select_analogs;
use crate::bootstrap::simulate_pct_changes;
use crate::config::SimConfig;
use crate::significance::two_sided_p;

/// Outcome of the band-multiplier sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepOutcome {
    /// Smallest p-value across the base evaluation and all usable bands.
    pub best_p_value: f64,
    /// Band that produced `best_p_value`.
    pub best_band: f64,
    /// Usable ladder bands (analog count met `min_samples`).
    pub bands_attempted: usize,
    /// Ladder bands skipped for lack of analogs.
    pub bands_skipped: usize,
    /// True iff `best_p_value < danger_threshold` and the ladder searched
    /// more than one usable band.
    pub dangerous: bool,
}

/// Run the multiplier ladder against an already-evaluated base band.
///
/// `indicator` and `targets` are the decidable-prefix columns; `base_p` and
/// `base_band` come from the base evaluation and seed the best-p tracking,
/// so the sweep can only ever improve on (or confirm) the base result.
#[allow(clippy::too_many_arguments)]
pub fn run_sweep(
    indicator: &[f64],
    targets: &[f64],
    shocked: f64,
    base_band: f64,
    base_p: f64,
    n_sims: usize,
    config: &SimConfig,
    seeds: &SeedHierarchy,
) -> SweepOutcome {
    let mut best_p = base_p;
    let mut best_band = base_band;
    let mut attempted = 0usize;
    let mut skipped = 0usize;

    for &multiplier in &config.band_multipliers {
        let band = base_band * multiplier;
        let analogs = select_analogs(indicator, targets, shocked, band);
        if analogs.len() < config.min_samples {
            skipped += 1;
            continue;
        }

        let context = format!("band={multiplier:.4}");
        // Sample-size precondition holds, so the engine cannot fail here.
        let Ok(pct_changes) = simulate_pct_changes(
            &analogs,
            n_sims,
            config.horizon,
            config.min_samples,
            seeds,
            &context,
        ) else {
            skipped += 1;
            continue;
        };

        attempted += 1;
        let p = two_sided_p(&pct_changes);
        if p < best_p {
            best_p = p;
            best_band = band;
        }
    }

    SweepOutcome {
        best_p_value: best_p,
        best_band,
        bands_attempted: attempted,
        bands_skipped: skipped,
        dangerous: best_p < config.danger_threshold && attempted > 1,
    }
}
