//! Average Directional Index (ADX).
//!
//! Directional movement is taken from raw high/low differences, masked so
//! only the dominant positive side of each survives; DI lines are the
//! ratio of smoothed directional movement to ATR, and ADX is the smoothed
//! DX. All smoothing is a plain rolling mean, so the full warmup is roughly
//! two stacked windows.

use super::{rolling_mean, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("ADX{period}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut plus_dm = vec![0.0; n];
        let mut minus_dm = vec![0.0; n];
        let mut tr = vec![f64::NAN; n];

        for i in 0..n {
            if i > 0 {
                let up = bars[i].high - bars[i - 1].high;
                let down = (bars[i].low - bars[i - 1].low).abs();
                // Keep only the dominant side; ties and NaN collapse to zero.
                if up > down && up > 0.0 {
                    plus_dm[i] = up;
                }
                if down > plus_dm[i] && down > 0.0 {
                    minus_dm[i] = down;
                }
            }

            let range = bars[i].high - bars[i].low;
            let mut candidates = vec![range];
            if i > 0 {
                let prev_close = bars[i - 1].adj_close;
                candidates.push((bars[i].high - prev_close).abs());
                candidates.push((bars[i].low - prev_close).abs());
            }
            tr[i] = candidates
                .into_iter()
                .filter(|v| !v.is_nan())
                .fold(f64::NAN, f64::max);
        }

        let atr = rolling_mean(&tr, self.period);
        let plus_sm = rolling_mean(&plus_dm, self.period);
        let minus_sm = rolling_mean(&minus_dm, self.period);

        let dx: Vec<f64> = (0..n)
            .map(|i| {
                if atr[i].is_nan() || plus_sm[i].is_nan() || minus_sm[i].is_nan() || atr[i] == 0.0 {
                    return f64::NAN;
                }
                let plus_di = 100.0 * plus_sm[i] / atr[i];
                let minus_di = 100.0 * minus_sm[i] / atr[i];
                let sum = plus_di + minus_di;
                if sum == 0.0 {
                    return f64::NAN;
                }
                100.0 * (plus_di - minus_di).abs() / sum
            })
            .collect();

        rolling_mean(&dx, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn adx_warmup_spans_two_windows() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let result = Adx::new(14).compute(&make_bars(&closes));
        // dx needs one full window (valid from 13), adx a second on top
        for i in 0..26 {
            assert!(result[i].is_nan(), "expected NaN at index {i}");
        }
        assert!(!result[26].is_nan());
    }

    #[test]
    fn adx_strong_trend_reads_high() {
        let trending: Vec<f64> = (0..80).map(|i| 100.0 + 2.0 * i as f64).collect();
        let result = Adx::new(14).compute(&make_bars(&trending));
        let last = result[79];
        assert!(last > 50.0, "strong trend should give high ADX, got {last}");
    }

    #[test]
    fn adx_bounded_0_100() {
        let closes: Vec<f64> = (0..100)
            .map(|i| 100.0 + (i as f64 * 0.9).sin() * 4.0 + i as f64 * 0.1)
            .collect();
        let result = Adx::new(14).compute(&make_bars(&closes));
        for v in result.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v), "ADX out of bounds: {v}");
        }
    }
}
