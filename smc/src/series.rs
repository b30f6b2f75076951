use std::ops::Deref;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::candle::Candle;
use crate::constant::{DataError, SmcError};

/// Time-ordered, validated candle sequence.
///
/// Construction fails fast on the first malformed bar or non-increasing
/// timestamp, so every detector downstream can assume clean input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SmcError> {
        for (index, candle) in candles.iter().enumerate() {
            candle.check(index)?;
            if index > 0 {
                let previous = candles[index - 1].timestamp;
                if candle.timestamp <= previous {
                    return Err(SmcError::NonMonotonicTimestamp {
                        index,
                        previous,
                        current: candle.timestamp,
                    });
                }
            }
        }
        Ok(Self { candles })
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, SmcError> {
        let candles = read_csv_candles(path)?;
        Self::new(candles)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn tail(&self, n: usize) -> Self {
        let start = self.candles.len().saturating_sub(n);
        Self {
            candles: self.candles[start..].to_vec(),
        }
    }
}

impl Deref for CandleSeries {
    type Target = [Candle];

    fn deref(&self) -> &Self::Target {
        &self.candles
    }
}

#[derive(Debug, Deserialize)]
struct CsvCandleRow {
    #[serde(alias = "datetime", alias = "time", alias = "date")]
    timestamp: String,
    #[serde(alias = "open_price")]
    open: f64,
    #[serde(alias = "high_price")]
    high: f64,
    #[serde(alias = "low_price")]
    low: f64,
    #[serde(alias = "close_price")]
    close: f64,
    #[serde(default)]
    volume: f64,
}

/// Reads raw candle rows without validating them.
pub fn read_csv_candles(path: impl AsRef<Path>) -> Result<Vec<Candle>, DataError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let mut out = Vec::new();

    for row in reader.deserialize::<CsvCandleRow>() {
        let row = row?;
        out.push(Candle {
            timestamp: parse_timestamp(&row.timestamp)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    debug!(path = %path.display(), rows = out.len(), "loaded candle csv");
    Ok(out)
}

/// Accepts RFC3339, a few `%Y-%m-%d %H:%M:%S` variants, a bare date, or an
/// integer epoch (seconds up to 10 digits, milliseconds above).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DataError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(epoch) = value.parse::<i64>() {
        let parsed = if value.trim_start_matches('-').len() <= 10 {
            Utc.timestamp_opt(epoch, 0).single()
        } else {
            Utc.timestamp_millis_opt(epoch).single()
        };
        return parsed.ok_or_else(|| DataError::InvalidDatetime(value.to_string()));
    }

    let patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for pattern in patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(DataError::InvalidDatetime(value.to_string()))
}
