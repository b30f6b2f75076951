use serde::Serialize;

use crate::candle::Candle;

use super::core::Indicator;
use super::ema::Ema;
use super::rsi::Rsi;
use super::sma::Sma;

pub const RSI_PERIOD: usize = 14;
pub const AVERAGE_PERIOD: usize = 20;
const NEUTRAL_RSI: f64 = 50.0;

/// Latest readings of the auxiliary indicators over a candle series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub price_change_pct: f64,
    pub current_price: f64,
    pub volume_sum: f64,
    pub sma_20: Option<f64>,
    pub ema_20: Option<f64>,
}

impl IndicatorSnapshot {
    /// `None` for an empty series. RSI needs more than `RSI_PERIOD` bars and
    /// falls back to a neutral 50 otherwise.
    pub fn compute(candles: &[Candle]) -> Option<Self> {
        let last = candles.last()?;

        let price_change_pct = match candles.len().checked_sub(2).map(|i| candles[i].close) {
            Some(prev) if prev != 0.0 => (last.close - prev) / prev * 100.0,
            _ => 0.0,
        };

        Some(Self {
            rsi: (candles.len() > RSI_PERIOD)
                .then(|| Rsi::new(RSI_PERIOD).last_value(candles))
                .flatten()
                .unwrap_or(NEUTRAL_RSI),
            price_change_pct,
            current_price: last.close,
            volume_sum: candles.iter().map(|c| c.volume).sum(),
            sma_20: Sma::new(AVERAGE_PERIOD).last_value(candles),
            ema_20: Ema::new(AVERAGE_PERIOD).last_value(candles),
        })
    }
}
