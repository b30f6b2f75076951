//! 扫描错误。
//!
//! 数据不足不属于错误，见 `ScanReport::insufficient`。

use std::fmt::{Display, Formatter};

use smc::{SmcError, Timeframe};

#[derive(Debug)]
pub enum ScanError {
	/// 数据源无法提供 K 线。
	Source {
		symbol: String,
		timeframe: Timeframe,
		message: String,
	},
	/// K 线格式错误，整个 (symbol, timeframe) 分析被放弃。
	Analysis {
		symbol: String,
		timeframe: Timeframe,
		source: SmcError,
	},
}

impl ScanError {
	pub fn symbol(&self) -> &str {
		match self {
			Self::Source { symbol, .. } | Self::Analysis { symbol, .. } => symbol,
		}
	}

	pub fn timeframe(&self) -> Timeframe {
		match self {
			Self::Source { timeframe, .. } | Self::Analysis { timeframe, .. } => *timeframe,
		}
	}
}

impl Display for ScanError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Source {
				symbol,
				timeframe,
				message,
			} => write!(f, "{symbol} {timeframe}: candle source failed: {message}"),
			Self::Analysis {
				symbol,
				timeframe,
				source,
			} => write!(f, "{symbol} {timeframe}: analysis failed: {source}"),
		}
	}
}

impl std::error::Error for ScanError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Analysis { source, .. } => Some(source),
			Self::Source { .. } => None,
		}
	}
}
