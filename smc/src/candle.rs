use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constant::SmcError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_shadow(&self) -> f64 {
        self.high - self.close.max(self.open)
    }

    pub fn lower_shadow(&self) -> f64 {
        self.close.min(self.open) - self.low
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True when the bar's `[low, high]` range touches the `[bottom, top]` band.
    pub fn overlaps(&self, top: f64, bottom: f64) -> bool {
        self.low <= top && self.high >= bottom
    }

    pub fn unix_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    pub(crate) fn check(&self, index: usize) -> Result<(), SmcError> {
        let malformed = |reason: String| SmcError::MalformedCandle { index, reason };

        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(malformed(format!("{name} is not finite ({value})")));
            }
        }

        if self.high < self.low {
            return Err(malformed(format!(
                "high {} is below low {}",
                self.high, self.low
            )));
        }
        if self.high < self.open.max(self.close) {
            return Err(malformed(format!(
                "high {} is below body top {}",
                self.high,
                self.open.max(self.close)
            )));
        }
        if self.low > self.open.min(self.close) {
            return Err(malformed(format!(
                "low {} is above body bottom {}",
                self.low,
                self.open.min(self.close)
            )));
        }
        if self.volume < 0.0 {
            return Err(malformed(format!("volume {} is negative", self.volume)));
        }
        Ok(())
    }
}

/// Price band attached to an order block or fair value gap bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceZone {
    pub side: crate::constant::ZoneSide,
    pub top: f64,
    pub bottom: f64,
}

impl PriceZone {
    pub fn midpoint(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    pub fn touched_by(&self, candle: &Candle) -> bool {
        candle.overlaps(self.top, self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::Candle;
    use crate::constant::SmcError;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open,
            high,
            low,
            close,
            1.0,
        )
    }

    #[test]
    fn shadows_and_body() {
        let c = candle(10.0, 12.0, 9.0, 11.0);
        assert!(c.is_bullish());
        assert!((c.body() - 1.0).abs() < 1e-9);
        assert!((c.upper_shadow() - 1.0).abs() < 1e-9);
        assert!((c.lower_shadow() - 1.0).abs() < 1e-9);
        assert!((c.range() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn overlap_is_inclusive_on_edges() {
        let c = candle(10.0, 12.0, 9.0, 11.0);
        assert!(c.overlaps(9.0, 8.0));
        assert!(c.overlaps(14.0, 12.0));
        assert!(!c.overlaps(8.9, 8.0));
    }

    #[test]
    fn check_rejects_wick_inside_body() {
        let c = candle(10.0, 10.5, 9.0, 11.0);
        assert!(matches!(
            c.check(3),
            Err(SmcError::MalformedCandle { index: 3, .. })
        ));
        assert!(candle(f64::NAN, 1.0, 0.0, 0.5).check(0).is_err());
    }
}
