//! Relative Strength Index (RSI).
//!
//! Rolling-mean variant: average gain and average loss are plain rolling
//! means over the close-to-close changes (not Wilder smoothing).
//! RSI = 100 − 100 / (1 + avg_gain / avg_loss).
//! Edge cases: avg_loss == 0 with gains present → 100; a flat window
//! (both averages zero) is undefined → NaN.

use super::{diff, rolling_mean, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("RSI{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.adj_close).collect();
        let changes = diff(&closes);

        let gains: Vec<f64> = changes
            .iter()
            .map(|&c| if c.is_nan() { f64::NAN } else { c.max(0.0) })
            .collect();
        let losses: Vec<f64> = changes
            .iter()
            .map(|&c| if c.is_nan() { f64::NAN } else { (-c).max(0.0) })
            .collect();

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .iter()
            .zip(avg_loss.iter())
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else if l == 0.0 {
                    if g == 0.0 {
                        f64::NAN
                    } else {
                        100.0
                    }
                } else {
                    100.0 - 100.0 / (1.0 + g / l)
                }
            })
            .collect()
    }
}
