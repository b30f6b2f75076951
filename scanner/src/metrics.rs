//! 指标快照模块。
//!
//! 提供扫描器关键运行指标的只读快照结构。

/// 扫描器运行指标快照（自创建以来累计）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanMetrics {
	/// 已处理的 (symbol, timeframe) 任务数量。
	pub scanned: u64,
	/// 完成完整分析的任务数量。
	pub ready: u64,
	/// 因 K 线不足而无结论的任务数量。
	pub insufficient: u64,
	/// 数据源或数据格式失败的任务数量。
	pub failed: u64,
	/// 已报告的状态翻转数量。
	pub flips: u64,
}
