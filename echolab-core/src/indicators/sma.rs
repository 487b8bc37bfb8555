//! Simple Moving Average (SMA).
//!
//! Rolling mean of adjusted close over a lookback window.
//! First valid value at index period − 1.

use super::{rolling_mean, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("SMA{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.adj_close).collect();
        rolling_mean(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).compute(&bars);

        assert_eq!(result.len(), 7);
        for i in 0..4 {
            assert!(result[i].is_nan(), "expected NaN at index {i}");
        }
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Sma::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_short_series_all_nan() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = Sma::new(5).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn name_matches_column_convention() {
        assert_eq!(Sma::new(20).name(), "SMA20");
    }
}
