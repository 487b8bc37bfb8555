//! Integration tests for the full simulation pipeline.
//!
//! Exercises the entrypoint end-to-end over synthetic tables: error
//! taxonomy, base-band statistics, the sweep's danger contract, and the
//! query-to-simulation handoff.

use chrono::{Duration, NaiveDate};

use echolab_core::domain::{Bar, PriceTable};
use echolab_core::query::{parse_query, QueryError};
use echolab_runner::{forward_log_returns, simulate, SimConfig, SimError};

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            date: base + Duration::days(i as i64),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            volume: 1_000,
            adj_close: c,
        })
        .collect()
}

/// Rising prices with an oscillating indicator column named OSC.
fn fixture_table(rows: usize) -> PriceTable {
    let closes: Vec<f64> = (0..rows).map(|i| 100.0 * 1.002f64.powi(i as i32)).collect();
    let mut table = PriceTable::from_bars("NQ", make_bars(&closes)).unwrap();
    let osc: Vec<f64> = (0..rows).map(|i| (i as f64 * 0.7).sin() * 10.0).collect();
    table.insert_column("OSC", osc).unwrap();
    table
}

fn seeded_config() -> SimConfig {
    SimConfig {
        horizon: 20,
        min_samples: 20,
        seed: Some(42),
        ..Default::default()
    }
}

// ── Scenario A: missing indicator ───────────────────────────────────

#[test]
fn absent_indicator_column_fails_with_missing_indicator() {
    let table = fixture_table(300);
    let err = simulate(&table, "SMA20", 20.0, 1000, &seeded_config()).unwrap_err();
    assert!(matches!(err, SimError::MissingIndicator { .. }));
    assert!(err.to_string().contains("SMA20"));
}

// ── Scenario B: insufficient samples with exact counts ──────────────

#[test]
fn ten_row_table_reports_exact_shortfall() {
    // 15 bars leave 10 decidable rows at the default 5-period label. A
    // constant indicator with zero shock matches all of them exactly, so
    // the message must echo got 10 / need 50.
    let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
    let mut table = PriceTable::from_bars("NQ", make_bars(&closes)).unwrap();
    table.insert_column("LEVEL", vec![7.0; 15]).unwrap();

    let config = SimConfig {
        seed: Some(1),
        ..Default::default()
    };
    let err = simulate(&table, "LEVEL", 0.0, 1000, &config).unwrap_err();
    match &err {
        SimError::InsufficientSamples { got, need } => {
            assert_eq!(*got, 10);
            assert_eq!(*need, 50);
        }
        other => panic!("expected InsufficientSamples, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("got 10"));
    assert!(msg.contains("need 50"));
    assert!(msg.contains("widening the band"));
}

// ── Scenarios C/D: query grammar feeding the entrypoint ─────────────

#[test]
fn canonical_query_parses_and_simulates() {
    let parsed = parse_query("SELECT OSC FROM NQ WHERE CHANGE=0.5 SIM=200").unwrap();
    assert_eq!(parsed.indicator, "OSC");
    assert_eq!(parsed.asset, "NQ");
    assert_eq!(parsed.change, 0.5);
    assert_eq!(parsed.sim, 200);

    let table = fixture_table(400);
    let result = simulate(
        &table,
        &parsed.indicator,
        parsed.change,
        parsed.sim,
        &seeded_config(),
    )
    .unwrap();
    assert_eq!(result.n_sims, 200);
}

#[test]
fn query_missing_sim_clause_is_rejected() {
    let err = parse_query("SELECT SMA20 FROM NQ WHERE CHANGE=20").unwrap_err();
    assert_eq!(err, QueryError::InvalidQuery);
}

// ── Scenario E: target transform construction check ─────────────────

#[test]
fn constant_growth_series_has_constant_label() {
    let mut closes = vec![100.0];
    for _ in 0..50 {
        closes.push(closes.last().unwrap() * 1.01);
    }
    let labels = forward_log_returns(&closes, 5);
    let expected = (1.01f64).powi(5).ln();
    assert_eq!(labels.len(), 46);
    for label in labels {
        assert!((label - expected).abs() < 1e-12);
    }
}

// ── Round-trip: degenerate conditional returns ──────────────────────

#[test]
fn flat_prices_give_zero_variance_and_p_one() {
    // Flat prices make every label exactly zero; the simulated distribution
    // collapses to zero and the p-value saturates at 1.
    let mut table = PriceTable::from_bars("NQ", make_bars(&[100.0; 120])).unwrap();
    table.insert_column("LEVEL", vec![3.0; 120]).unwrap();

    let result = simulate(&table, "LEVEL", 0.0, 500, &seeded_config()).unwrap();
    assert_eq!(result.mean_pct_change, 0.0);
    assert_eq!(result.median_pct_change, 0.0);
    assert_eq!(result.p5, 0.0);
    assert_eq!(result.p95, 0.0);
    assert_eq!(result.p_value, 1.0);
    assert_eq!(result.best_p_value, 1.0);
    assert!(!result.dangerous);
}

// ── Sweep danger contract ───────────────────────────────────────────

#[test]
fn single_band_ladder_is_never_dangerous() {
    // Rising prices: every simulated outcome is positive, so p = 0 at every
    // band. With a one-entry ladder the flag must still stay down.
    let table = fixture_table(400);
    let config = SimConfig {
        band_multipliers: vec![1.0],
        ..seeded_config()
    };
    let result = simulate(&table, "OSC", 0.0, 500, &config).unwrap();
    assert!(result.best_p_value < 0.05);
    assert_eq!(result.bands_attempted, 1);
    assert!(!result.dangerous);
}

#[test]
fn multi_band_ladder_with_significance_is_dangerous() {
    let table = fixture_table(400);
    let result = simulate(&table, "OSC", 0.0, 500, &seeded_config()).unwrap();
    assert!(result.best_p_value < 0.05);
    assert!(result.bands_attempted > 1);
    assert!(result.dangerous);
}

#[test]
fn insignificant_multi_band_sweep_is_not_dangerous() {
    // Square-wave prices make the labels an almost exactly balanced mix of
    // +d and -d; a constant indicator selects every decidable row at every
    // band, so both tails stay heavy and every band still gets attempted.
    let closes: Vec<f64> = (0..400)
        .map(|i| if (i / 5) % 2 == 0 { 100.0 } else { 101.0 })
        .collect();
    let mut table = PriceTable::from_bars("NQ", make_bars(&closes)).unwrap();
    table.insert_column("LEVEL", vec![3.0; 400]).unwrap();

    let result = simulate(&table, "LEVEL", 0.0, 500, &seeded_config()).unwrap();
    assert!(result.p_value >= 0.05, "p was {}", result.p_value);
    assert!(result.bands_attempted > 1);
    assert!(!result.dangerous);
}

// ── Determinism and ownership ───────────────────────────────────────

#[test]
fn table_is_not_mutated_by_simulation() {
    let table = fixture_table(400);
    let before_len = table.len();
    let before_col = table.column("OSC").unwrap().to_vec();

    let _ = simulate(&table, "OSC", 0.5, 300, &seeded_config()).unwrap();

    assert_eq!(table.len(), before_len);
    assert_eq!(table.column("OSC").unwrap(), before_col.as_slice());
}

#[test]
fn repeated_calls_with_same_seed_agree() {
    let table = fixture_table(400);
    let a = simulate(&table, "OSC", 1.0, 400, &seeded_config()).unwrap();
    let b = simulate(&table, "OSC", 1.0, 400, &seeded_config()).unwrap();
    assert_eq!(a.mean_pct_change, b.mean_pct_change);
    assert_eq!(a.p5, b.p5);
    assert_eq!(a.p95, b.p95);
    assert_eq!(a.best_band, b.best_band);
}

#[test]
fn band_scales_with_indicator_volatility() {
    // Same table, indicator magnified 10x: the auto-derived band follows.
    let rows = 400;
    let table_small = fixture_table(rows);
    let mut table_large = fixture_table(rows);
    let scaled: Vec<f64> = table_large
        .column("OSC")
        .unwrap()
        .iter()
        .map(|v| v * 10.0)
        .collect();
    table_large.insert_column("OSC", scaled).unwrap();

    let a = simulate(&table_small, "OSC", 0.0, 100, &seeded_config()).unwrap();
    let b = simulate(&table_large, "OSC", 0.0, 100, &seeded_config()).unwrap();
    assert!((b.band_used / a.band_used - 10.0).abs() < 1e-9);
}
