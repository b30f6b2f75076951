use crate::candle::Candle;

use super::core::Indicator;

/// Exponentially weighted mean over every value seen so far, normalized
/// by the sum of the weights: `Σ (1-α)^i x[t-i] / Σ (1-α)^i`.
#[derive(Debug, Clone)]
pub(crate) struct WeightedMean {
    decay: f64,
    numerator: f64,
    denominator: f64,
}

impl WeightedMean {
    pub(crate) fn new(alpha: f64) -> Self {
        Self {
            decay: 1.0 - alpha,
            numerator: 0.0,
            denominator: 0.0,
        }
    }

    pub(crate) fn push(&mut self, value: f64) -> f64 {
        self.numerator = value + self.decay * self.numerator;
        self.denominator = 1.0 + self.decay * self.denominator;
        self.numerator / self.denominator
    }

    pub(crate) fn reset(&mut self) {
        self.numerator = 0.0;
        self.denominator = 0.0;
    }
}

/// Exponential average of closes with `α = 2 / (period + 1)`, weighted
/// over the whole history rather than seeded recursively.
#[derive(Debug, Clone)]
pub struct Ema {
    name: String,
    mean: WeightedMean,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            name: format!("ema_{period}"),
            mean: WeightedMean::new(2.0 / (period as f64 + 1.0)),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.mean.reset();
    }

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        Some(self.mean.push(candle.close))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::Ema;
    use crate::candle::Candle;
    use crate::indicator::Indicator;

    #[test]
    fn early_values_are_weight_normalized() {
        let candles: Vec<Candle> = [1.0, 2.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let ts = Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap();
                Candle::new(ts, c, c, c, c, 1.0)
            })
            .collect();
        let mut ema = Ema::new(3);

        assert_eq!(ema.update(&candles[0]), Some(1.0));
        let value = ema.last_value(&candles).unwrap();
        assert!((value - 17.0 / 7.0).abs() < 1e-12);
    }
}
