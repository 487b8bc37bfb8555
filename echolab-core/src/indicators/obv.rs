//! On-Balance Volume (OBV).
//!
//! Cumulative signed volume: rises when price closes up, falls when it
//! closes down. Defined from index 0 (the first bar contributes zero).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Obv {
    name: String,
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl Obv {
    pub fn new() -> Self {
        Self {
            name: "OBV".to_string(),
        }
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut out = Vec::with_capacity(bars.len());
        let mut acc = 0.0;
        for i in 0..bars.len() {
            let direction = if i == 0 {
                0.0
            } else {
                let delta = bars[i].adj_close - bars[i - 1].adj_close;
                if delta.is_nan() {
                    0.0
                } else if delta > 0.0 {
                    1.0
                } else if delta < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            };
            acc += direction * bars[i].volume as f64;
            out.push(acc);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn obv_accumulates_signed_volume() {
        // up, up, down, flat  (volume is 1000 per bar in make_bars)
        let bars = make_bars(&[100.0, 101.0, 102.0, 101.0, 101.0]);
        let result = Obv::new().compute(&bars);
        assert_eq!(result, vec![0.0, 1_000.0, 2_000.0, 1_000.0, 1_000.0]);
    }

    #[test]
    fn obv_has_no_warmup() {
        let result = Obv::new().compute(&make_bars(&[100.0]));
        assert_eq!(result, vec![0.0]);
    }
}
