//! K 线数据源。
//!
//! 扫描器只依赖 `CandleSource`；网络行情源不在本 crate 内。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use smc::{read_csv_candles, Candle, Timeframe};

/// 按 (symbol, timeframe) 提供一段按时间排序的 K 线。
///
/// 实现需可跨线程共享；每次调用返回调用方独占的缓冲区。
pub trait CandleSource: Send + Sync {
	fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>, String>;
}

/// 从目录读取 `<SYMBOL>_<tf>.csv`，symbol 中的 `/` 映射为 `_`。
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
	dir: PathBuf,
}

impl CsvDirectorySource {
	pub fn new(dir: impl AsRef<Path>) -> Self {
		Self {
			dir: dir.as_ref().to_path_buf(),
		}
	}

	pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
		let name = format!("{}_{}.csv", symbol.trim().replace('/', "_"), timeframe.as_str());
		self.dir.join(name)
	}
}

impl CandleSource for CsvDirectorySource {
	fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>, String> {
		let path = self.path_for(symbol, timeframe);
		read_csv_candles(&path).map_err(|e| format!("{}: {e}", path.display()))
	}
}

/// 内存数据源，用于回放与测试。
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	series: HashMap<(String, Timeframe), Vec<Candle>>,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, symbol: impl Into<String>, timeframe: Timeframe, candles: Vec<Candle>) {
		self.series.insert((symbol.into(), timeframe), candles);
	}
}

impl CandleSource for MemorySource {
	fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>, String> {
		self.series
			.get(&(symbol.to_string(), timeframe))
			.cloned()
			.ok_or_else(|| format!("no candles for {symbol} {timeframe}"))
	}
}
