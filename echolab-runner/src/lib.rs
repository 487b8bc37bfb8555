//! EchoLab Runner — the conditional-analog simulation pipeline.
//!
//! This crate builds on `echolab-core` to provide:
//! - Forward log-return target transform
//! - Analog selection with pluggable band calibration
//! - Block bootstrap engine (rayon-parallel, deterministically seeded)
//! - Significance evaluation (two-sided empirical p-value)
//! - Band-multiplier robustness sweep with the `dangerous` flag
//! - The `simulate` entrypoint tying them together
//! - Correlation-based indicator ranking with CSV export

pub mod analog;
pub mod bootstrap;
pub mod config;
pub mod ranking;
pub mod significance;
pub mod simulate;
pub mod sweep;
pub mod target;

pub use analog::{select_analogs, BandPolicy, VolatilityBand};
pub use bootstrap::{simulate_pct_changes, BootstrapError};
pub use config::{ConfigError, SimConfig};
pub use ranking::{score_indicators, top_indicators, write_scores_csv, IndicatorScore, RankingError};
pub use significance::{summarize, two_sided_p, DistributionSummary};
pub use simulate::{simulate, simulate_with_policy, SimError, SimulationResult, MAX_TOTAL_DRAWS};
pub use sweep::{run_sweep, SweepOutcome};
pub use target::forward_log_returns;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<SimConfig>();
        assert_sync::<SimConfig>();
    }

    #[test]
    fn result_types_are_send_sync() {
        assert_send::<SimulationResult>();
        assert_sync::<SimulationResult>();
        assert_send::<DistributionSummary>();
        assert_sync::<DistributionSummary>();
        assert_send::<SweepOutcome>();
        assert_sync::<SweepOutcome>();
    }

    #[test]
    fn ranking_types_are_send_sync() {
        assert_send::<IndicatorScore>();
        assert_sync::<IndicatorScore>();
    }
}
