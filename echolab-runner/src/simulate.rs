//! Simulation entrypoint.
//!
//! One call = one pass through the state machine:
//!
//! ```text
//! INIT → BASE_BAND_EVAL → { FAIL(insufficient samples) | SWEEP → RESULT }
//! ```
//!
//! The call borrows the table read-only, derives its own copies of the
//! label and indicator columns, and returns a value object that is never
//! mutated afterward. Nothing is cached between calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use echolab_core::domain::PriceTable;
use echolab_core::rng::SeedHierarchy;

use crate::analog::{select_analogs, BandPolicy, VolatilityBand};
use crate::bootstrap::{simulate_pct_changes, BootstrapError};
use crate::config::{ConfigError, SimConfig};
use crate::significance::summarize;
use crate::sweep::run_sweep;
use crate::target::forward_log_returns;

/// Upper bound on `n_sims × horizon`: the caller supplies both freely, and
/// an unbounded product means unbounded latency.
pub const MAX_TOTAL_DRAWS: u64 = 500_000_000;

/// Errors terminating a simulation call. Every failure is a deterministic
/// function of the inputs; nothing here is worth retrying.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("indicator column '{indicator}' not found for asset '{asset}'")]
    MissingIndicator { indicator: String, asset: String },

    #[error(
        "not enough samples for simulation (got {got}, need {need}) — \
         try widening the band or extending the date range"
    )]
    InsufficientSamples { got: usize, need: usize },

    #[error("table has {rows} rows, too short for a {label_horizon}-period forward label")]
    TableTooShort { rows: usize, label_horizon: usize },

    #[error("simulation workload out of range: n_sims × horizon = {draws} (1..={max})")]
    WorkloadOutOfRange { draws: u64, max: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The simulation result value object.
///
/// `p_value` and `sample_size` describe the base band; the sweep's
/// contribution is confined to `best_p_value`, `best_band`,
/// `bands_attempted` and `dangerous`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub asset: String,
    pub indicator: String,
    /// Mean simulated percentage change at the base band.
    pub mean_pct_change: f64,
    pub median_pct_change: f64,
    pub p5: f64,
    pub p95: f64,
    pub n_sims: usize,
    /// Analog count at the base band.
    pub sample_size: usize,
    /// Latest decidable indicator reading.
    pub baseline_indicator: f64,
    /// Baseline plus the requested change.
    pub shocked_indicator: f64,
    /// Base tolerance band.
    pub band_used: f64,
    /// Two-sided p-value at the base band.
    pub p_value: f64,
    /// Minimum p-value across the base evaluation and the sweep.
    pub best_p_value: f64,
    /// Band that produced `best_p_value`.
    pub best_band: f64,
    /// Usable sweep bands evaluated.
    pub bands_attempted: usize,
    /// Significance appeared only through a multi-band search.
    pub dangerous: bool,
    /// Master seed the distributions were drawn with.
    pub master_seed: u64,
}

/// Run a simulation with the default band calibration.
pub fn simulate(
    table: &PriceTable,
    indicator: &str,
    change: f64,
    n_sims: usize,
    config: &SimConfig,
) -> Result<SimulationResult, SimError> {
    simulate_with_policy(table, indicator, change, n_sims, config, &VolatilityBand::default())
}

/// Run a simulation with an explicit band calibration policy.
pub fn simulate_with_policy(
    table: &PriceTable,
    indicator: &str,
    change: f64,
    n_sims: usize,
    config: &SimConfig,
    band_policy: &dyn BandPolicy,
) -> Result<SimulationResult, SimError> {
    config.validate()?;

    let draws = (n_sims as u64).saturating_mul(config.horizon as u64);
    if draws == 0 || draws > MAX_TOTAL_DRAWS {
        return Err(SimError::WorkloadOutOfRange {
            draws,
            max: MAX_TOTAL_DRAWS,
        });
    }

    let column = table
        .column(indicator)
        .ok_or_else(|| SimError::MissingIndicator {
            indicator: indicator.to_string(),
            asset: table.asset().to_string(),
        })?;

    // Target transform: label the decidable prefix, drop the tail.
    let adj_close = table.adj_close();
    let targets = forward_log_returns(&adj_close, config.label_horizon);
    if targets.is_empty() {
        return Err(SimError::TableTooShort {
            rows: table.len(),
            label_horizon: config.label_horizon,
        });
    }
    let indicator_col = &column[..targets.len()];

    let baseline = indicator_col[indicator_col.len() - 1];
    let shocked = baseline + change;
    let band = band_policy.base_band(indicator_col);

    let seeds = match config.seed {
        Some(seed) => SeedHierarchy::new(seed),
        None => SeedHierarchy::from_entropy(),
    };

    // Base band evaluation: the only place a sample shortfall is fatal.
    let analogs = select_analogs(indicator_col, &targets, shocked, band);
    let pct_changes = simulate_pct_changes(
        &analogs,
        n_sims,
        config.horizon,
        config.min_samples,
        &seeds,
        "base",
    )
    .map_err(|e| match e {
        BootstrapError::InsufficientSamples { got, need } => {
            SimError::InsufficientSamples { got, need }
        }
    })?;

    let summary = summarize(&pct_changes);

    let sweep = run_sweep(
        indicator_col,
        &targets,
        shocked,
        band,
        summary.p_value,
        n_sims,
        config,
        &seeds,
    );

    Ok(SimulationResult {
        asset: table.asset().to_string(),
        indicator: indicator.to_string(),
        mean_pct_change: summary.mean,
        median_pct_change: summary.median,
        p5: summary.p5,
        p95: summary.p95,
        n_sims,
        sample_size: analogs.len(),
        baseline_indicator: baseline,
        shocked_indicator: shocked,
        band_used: band,
        p_value: summary.p_value,
        best_p_value: sweep.best_p_value,
        best_band: sweep.best_band,
        bands_attempted: sweep.bands_attempted,
        dangerous: sweep.dangerous,
        master_seed: seeds.master_seed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use echolab_core::domain::Bar;

    /// Table with a spread indicator and steadily rising prices.
    fn fixture_table(rows: usize) -> PriceTable {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars: Vec<Bar> = (0..rows)
            .map(|i| {
                let close = 100.0 * 1.002f64.powi(i as i32);
                Bar {
                    date: base + Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000,
                    adj_close: close,
                }
            })
            .collect();
        let mut table = PriceTable::from_bars("NQ", bars).unwrap();
        // Oscillating indicator so every shocked value finds analogs.
        let col: Vec<f64> = (0..rows).map(|i| (i as f64 * 0.7).sin() * 10.0).collect();
        table.insert_column("OSC", col).unwrap();
        table
    }

    fn test_config() -> SimConfig {
        SimConfig {
            horizon: 20,
            min_samples: 20,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn missing_indicator_fails_fast() {
        let table = fixture_table(300);
        let err = simulate(&table, "SMA20", 1.0, 100, &test_config()).unwrap_err();
        match err {
            SimError::MissingIndicator { indicator, asset } => {
                assert_eq!(indicator, "SMA20");
                assert_eq!(asset, "NQ");
            }
            other => panic!("expected MissingIndicator, got {other:?}"),
        }
    }

    #[test]
    fn insufficient_samples_echoes_counts() {
        let table = fixture_table(15); // 10 decidable rows at label_horizon 5
        let config = SimConfig {
            min_samples: 50,
            ..test_config()
        };
        let err = simulate(&table, "OSC", 0.0, 100, &config).unwrap_err();
        match err {
            SimError::InsufficientSamples { got, need } => {
                assert!(got <= 10);
                assert_eq!(need, 50);
            }
            other => panic!("expected InsufficientSamples, got {other:?}"),
        }
    }

    #[test]
    fn result_reports_base_band_statistics() {
        let table = fixture_table(400);
        let result = simulate(&table, "OSC", 0.0, 500, &test_config()).unwrap();

        assert_eq!(result.n_sims, 500);
        assert!(result.sample_size >= 20);
        assert!(result.band_used > 0.0);
        assert!((0.0..=1.0).contains(&result.p_value));
        assert!(result.best_p_value <= result.p_value);
        assert_eq!(result.master_seed, 42);
        // Rising prices: the simulated distribution should lean positive.
        assert!(result.mean_pct_change > 0.0);
    }

    #[test]
    fn pinned_seed_reproduces_exactly() {
        let table = fixture_table(400);
        let a = simulate(&table, "OSC", 0.5, 300, &test_config()).unwrap();
        let b = simulate(&table, "OSC", 0.5, 300, &test_config()).unwrap();
        assert_eq!(a.mean_pct_change, b.mean_pct_change);
        assert_eq!(a.p_value, b.p_value);
        assert_eq!(a.best_p_value, b.best_p_value);
        assert_eq!(a.dangerous, b.dangerous);
    }

    #[test]
    fn entropy_seeding_varies_between_calls() {
        let table = fixture_table(400);
        let config = SimConfig {
            seed: None,
            ..test_config()
        };
        let a = simulate(&table, "OSC", 0.5, 300, &config).unwrap();
        let b = simulate(&table, "OSC", 0.5, 300, &config).unwrap();
        assert_ne!(a.master_seed, b.master_seed);
    }

    #[test]
    fn shocked_value_offsets_latest_reading() {
        let table = fixture_table(400);
        let result = simulate(&table, "OSC", 2.5, 200, &test_config()).unwrap();
        assert!((result.shocked_indicator - (result.baseline_indicator + 2.5)).abs() < 1e-12);
    }

    #[test]
    fn zero_n_sims_is_rejected() {
        let table = fixture_table(400);
        let err = simulate(&table, "OSC", 0.0, 0, &test_config()).unwrap_err();
        assert!(matches!(err, SimError::WorkloadOutOfRange { draws: 0, .. }));
    }

    #[test]
    fn short_table_reports_missing_label() {
        let table = fixture_table(4); // label_horizon 5 leaves nothing decidable
        let err = simulate(&table, "OSC", 0.0, 100, &test_config()).unwrap_err();
        assert!(matches!(err, SimError::TableTooShort { rows: 4, .. }));
    }

    #[test]
    fn result_serializes_to_json() {
        let table = fixture_table(400);
        let result = simulate(&table, "OSC", 0.0, 100, &test_config()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: SimulationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sample_size, result.sample_size);
        assert_eq!(back.dangerous, result.dangerous);
    }
}
