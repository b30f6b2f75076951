use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Undetermined,
    Bullish,
    Bearish,
}

/// Per-bar structure event, encoded as `{0, 1, -1, 2, -2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureSignal {
    #[default]
    None,
    BosUp,
    BosDown,
    ChochUp,
    ChochDown,
}

impl StructureSignal {
    pub fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::BosUp => 1,
            Self::BosDown => -1,
            Self::ChochUp => 2,
            Self::ChochDown => -2,
        }
    }

    pub fn is_up(self) -> bool {
        matches!(self, Self::BosUp | Self::ChochUp)
    }

    pub fn is_down(self) -> bool {
        matches!(self, Self::BosDown | Self::ChochDown)
    }

    pub fn is_break(self) -> bool {
        self != Self::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSide {
    Bullish,
    Bearish,
}

impl ZoneSide {
    pub fn code(self) -> i32 {
        match self {
            Self::Bullish => 1,
            Self::Bearish => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweep {
    #[default]
    None,
    SweptUp,
    SweptDown,
}

impl Sweep {
    pub fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::SweptUp => 1,
            Self::SweptDown => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryTag {
    #[serde(rename = "long_smc_simple")]
    LongSmcSimple,
    #[serde(rename = "short_smc_simple")]
    ShortSmcSimple,
}

impl EntryTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LongSmcSimple => "long_smc_simple",
            Self::ShortSmcSimple => "short_smc_simple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::D1 => "1d",
            Self::W1 => "1w",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DataError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "30m" => Ok(Self::M30),
            "1h" => Ok(Self::H1),
            "4h" => Ok(Self::H4),
            "1d" => Ok(Self::D1),
            "1w" => Ok(Self::W1),
            _ => Err(DataError::InvalidTimeframe(value.to_string())),
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            Self::M1 => Duration::minutes(1),
            Self::M5 => Duration::minutes(5),
            Self::M15 => Duration::minutes(15),
            Self::M30 => Duration::minutes(30),
            Self::H1 => Duration::hours(1),
            Self::H4 => Duration::hours(4),
            Self::D1 => Duration::days(1),
            Self::W1 => Duration::weeks(1),
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum DataError {
    InvalidTimeframe(String),
    InvalidDatetime(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Polars(polars::error::PolarsError),
    Yaml(serde_yaml::Error),
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeframe(v) => write!(f, "invalid timeframe: {v}"),
            Self::InvalidDatetime(v) => write!(f, "invalid datetime: {v}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<polars::error::PolarsError> for DataError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}

impl From<serde_yaml::Error> for DataError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

/// Analysis failures. Too-short input is not one of these; see
/// [`crate::AnalysisOutcome::InsufficientData`].
#[derive(Debug)]
pub enum SmcError {
    MalformedCandle {
        index: usize,
        reason: String,
    },
    NonMonotonicTimestamp {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
    InvalidConfig(String),
    Data(DataError),
}

impl Display for SmcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedCandle { index, reason } => {
                write!(f, "malformed candle at index {index}: {reason}")
            }
            Self::NonMonotonicTimestamp {
                index,
                previous,
                current,
            } => write!(
                f,
                "timestamp at index {index} ({current}) is not after previous ({previous})"
            ),
            Self::InvalidConfig(v) => write!(f, "invalid config: {v}"),
            Self::Data(e) => write!(f, "data error: {e}"),
        }
    }
}

impl std::error::Error for SmcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Data(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataError> for SmcError {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}

impl From<std::io::Error> for SmcError {
    fn from(value: std::io::Error) -> Self {
        Self::Data(DataError::Io(value))
    }
}

impl From<csv::Error> for SmcError {
    fn from(value: csv::Error) -> Self {
        Self::Data(DataError::Csv(value))
    }
}
