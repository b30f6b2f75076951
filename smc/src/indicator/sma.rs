use std::collections::VecDeque;

use crate::candle::Candle;

use super::core::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    name: String,
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            name: format!("sma_{period}"),
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        self.window.push_back(candle.close);
        self.sum += candle.close;
        if self.window.len() > self.period {
            if let Some(oldest) = self.window.pop_front() {
                self.sum -= oldest;
            }
        }
        (self.window.len() == self.period).then(|| self.sum / self.period as f64)
    }
}
