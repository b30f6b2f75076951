//! `scanner` crate 入口。
//!
//! 职责：并发扫描多个 (symbol, timeframe)，判定市场状态翻转并分发（fan-out）给订阅者。
//! 该文件只做模块装配与统一导出，具体实现位于各子模块。
//!
//! 模块分工：
//! - `source`：K 线数据源抽象与 CSV 目录实现。
//! - `scan`：工作线程池与主流程。
//! - `distributor`：按周期广播翻转事件。
//! - `metrics`：运行指标快照。
//! - `error`：扫描错误。
//!
//! 快速示例：
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use scanner::{CsvDirectorySource, ScanJob, Scanner};
//! use smc::{SmcConfig, Timeframe};
//!
//! let source = Arc::new(CsvDirectorySource::new("data"));
//! let scanner = Scanner::new(source, SmcConfig::default()).unwrap();
//! let mut flips = scanner.subscribe(Timeframe::H4);
//!
//! let jobs = vec![ScanJob::new("BTC/USDT", Timeframe::H4)];
//! let report = scanner.scan(&jobs, &HashMap::new());
//! let next_round = report.states;
//! let _ = flips.try_recv();
//! # let _ = next_round;
//! ```

mod distributor;
mod error;
mod metrics;
mod scan;
mod source;

pub use distributor::Distributor;
pub use error::ScanError;
pub use metrics::ScanMetrics;
pub use scan::{ScanConfig, ScanJob, ScanKey, ScanReport, Scanner, SharedFlip, StateFlip};
pub use source::{CandleSource, CsvDirectorySource, MemorySource};
