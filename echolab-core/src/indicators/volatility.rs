//! Rolling volatility: sample standard deviation of simple returns.

use super::{rolling_std, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RollingVol {
    period: usize,
    name: String,
}

impl RollingVol {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "volatility period must be >= 2");
        Self {
            period,
            name: format!("VOL{period}"),
        }
    }
}

impl Indicator for RollingVol {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut returns = vec![f64::NAN; n];
        for i in 1..n {
            let prev = bars[i - 1].adj_close;
            if prev != 0.0 {
                returns[i] = bars[i].adj_close / prev - 1.0;
            }
        }
        rolling_std(&returns, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn vol_of_constant_returns_is_zero() {
        // 1% per period: every simple return identical, stdev 0
        let mut closes = vec![100.0];
        for _ in 0..30 {
            closes.push(closes.last().unwrap() * 1.01);
        }
        let result = RollingVol::new(20).compute(&make_bars(&closes));
        assert_approx(result[30], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn vol_warmup_accounts_for_return_lag() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let result = RollingVol::new(20).compute(&make_bars(&closes));
        // returns start at index 1, so the first full window closes at 20
        for i in 0..20 {
            assert!(result[i].is_nan(), "expected NaN at index {i}");
        }
        assert!(!result[20].is_nan());
    }
}
