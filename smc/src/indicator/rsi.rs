use crate::candle::Candle;

use super::core::Indicator;
use super::ema::WeightedMean;

/// Relative strength index over weight-normalized exponential averages of
/// gains and losses with `α = 1 / period`.
///
/// The first bar counts as a zero change. Values start once `period` bars
/// have been seen. A window with neither gains nor losses has no value.
#[derive(Debug, Clone)]
pub struct Rsi {
    name: String,
    period: usize,
    prev_close: Option<f64>,
    seen: usize,
    gains: WeightedMean,
    losses: WeightedMean,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        let alpha = 1.0 / period as f64;
        Self {
            name: format!("rsi_{period}"),
            period,
            prev_close: None,
            seen: 0,
            gains: WeightedMean::new(alpha),
            losses: WeightedMean::new(alpha),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.seen = 0;
        self.gains.reset();
        self.losses.reset();
    }

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        let change = self
            .prev_close
            .replace(candle.close)
            .map_or(0.0, |prev| candle.close - prev);
        let avg_gain = self.gains.push(change.max(0.0));
        let avg_loss = self.losses.push((-change).max(0.0));

        self.seen += 1;
        if self.seen < self.period {
            return None;
        }
        if avg_loss == 0.0 {
            return (avg_gain > 0.0).then_some(100.0);
        }
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}
