//! Z-score of the close against its own rolling mean.

use super::{rolling_mean, rolling_std, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct ZScore {
    period: usize,
    name: String,
}

impl ZScore {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "z-score period must be >= 2");
        Self {
            period,
            name: format!("Z{period}"),
        }
    }
}

impl Indicator for ZScore {
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
                if m.is_nan() || s.is_nan() || s == 0.0 {
                    f64::NAN
                } else {
                    (close - m) / s
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn zscore_sign_follows_deviation() {
        let mut closes = vec![100.0; 19];
        closes.push(110.0); // jump above the window mean
        let result = ZScore::new(20).compute(&make_bars(&closes));
        assert!(result[19] > 0.0);
    }

    #[test]
    fn zscore_flat_window_is_undefined() {
        let result = ZScore::new(20).compute(&make_bars(&[100.0; 25]));
        assert!(result[24].is_nan());
    }
}
