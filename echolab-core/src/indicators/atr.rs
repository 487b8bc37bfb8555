//! Average True Range (ATR).
//!
//! True range = max(high − low, |high − prev_close|, |low − prev_close|),
//! using adjusted close for the previous-close terms; ATR is the rolling
//! mean of the true range. On the first bar only high − low is available.

use super::{rolling_mean, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("ATR{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut tr = vec![f64::NAN; n];

        for i in 0..n {
            let range = bars[i].high - bars[i].low;
            let mut candidates = vec![range];
            if i > 0 {
                let prev_close = bars[i - 1].adj_close;
                candidates.push((bars[i].high - prev_close).abs());
                candidates.push((bars[i].low - prev_close).abs());
            }
            // Max over the defined candidates; all-NaN stays NaN.
            tr[i] = candidates
                .into_iter()
                .filter(|v| !v.is_nan())
                .fold(f64::NAN, f64::max);
        }

        rolling_mean(&tr, self.period)
    }
}
