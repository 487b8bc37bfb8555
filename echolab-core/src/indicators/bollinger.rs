//! Bollinger %B.
//!
//! Position of the close within its Bollinger band:
//! %B = (close − lower) / (upper − lower), bands at SMA ± k·std.
//! 0 means the lower band, 1 the upper; values escape [0, 1] when price
//! leaves the band. Undefined when the band has zero width.

use super::{rolling_mean, rolling_std, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct BollingerPctB {
    period: usize,
    k: f64,
    name: String,
}

impl BollingerPctB {
    pub fn new(period: usize, k: f64) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        assert!(k > 0.0, "Bollinger k must be positive");
        Self {
            period,
            k,
            name: format!("BOLLB{period}"),
        }
    }
}

impl Indicator for BollingerPctB {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.adj_close).collect();
        let sma = rolling_mean(&closes, self.period);
        let std = rolling_std(&closes, self.period);

        closes
            .iter()
            .zip(sma.iter().zip(std.iter()))
            .map(|(&close, (&m, &s))| {
                if m.is_nan() || s.is_nan() {
                    return f64::NAN;
                }
                let width = 2.0 * self.k * s;
                if width == 0.0 {
                    return f64::NAN;
                }
                let lower = m - self.k * s;
                (close - lower) / width
            })
            .collect()
    }
}
