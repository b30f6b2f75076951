//! `Scanner` 主模块。
//!
//! 在有界工作线程池上并发分析多个 (symbol, timeframe)，
//! 对比上一轮状态得出翻转并经 distributor 广播。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam::channel;
use smc::{SmcConfig, SmcError, Timeframe};
use strategy::{MarketState, Strategy, StrategyReport};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{CandleSource, Distributor, ScanError, ScanMetrics};

/// 扫描键：(symbol, timeframe)。
pub type ScanKey = (String, Timeframe);

/// 共享翻转事件，多个订阅者共用同一份数据。
pub type SharedFlip = Arc<StateFlip>;

/// `Scanner` 初始化配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
	/// 工作线程数量上限。
	pub workers: usize,
	/// 每个广播频道的缓冲容量。
	pub channel_capacity: usize,
}

impl Default for ScanConfig {
	fn default() -> Self {
		let workers = thread::available_parallelism()
			.map(|x| x.get())
			.unwrap_or(4)
			.clamp(1, 16);
		Self {
			workers,
			channel_capacity: 1024,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanJob {
	pub symbol: String,
	pub timeframe: Timeframe,
}

impl ScanJob {
	pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
		Self {
			symbol: symbol.into(),
			timeframe,
		}
	}

	pub fn key(&self) -> ScanKey {
		(self.symbol.clone(), self.timeframe)
	}
}

/// 状态从 `from` 变为非中性的 `to`。
#[derive(Debug, Clone, PartialEq)]
pub struct StateFlip {
	pub symbol: String,
	pub timeframe: Timeframe,
	pub from: MarketState,
	pub to: MarketState,
	pub price: f64,
}

/// 一轮扫描的结果。`states` 只包含完成分析的键，可直接作为下一轮的输入。
#[derive(Debug, Default)]
pub struct ScanReport {
	pub states: HashMap<ScanKey, MarketState>,
	pub flips: Vec<StateFlip>,
	pub failures: Vec<ScanError>,
	pub insufficient: Vec<ScanKey>,
}

enum JobOutcome {
	Ready { state: MarketState, price: f64 },
	Insufficient,
	Failed(ScanError),
}

/// 扫描入口。
pub struct Scanner {
	source: Arc<dyn CandleSource>,
	strategy: Strategy,
	config: ScanConfig,
	distributor: Distributor,
	scanned: AtomicU64,
	ready: AtomicU64,
	insufficient: AtomicU64,
	failed: AtomicU64,
	flips: AtomicU64,
}

impl Scanner {
	pub fn new(source: Arc<dyn CandleSource>, smc_config: SmcConfig) -> Result<Self, SmcError> {
		Self::with_config(source, smc_config, ScanConfig::default())
	}

	pub fn with_config(
		source: Arc<dyn CandleSource>,
		smc_config: SmcConfig,
		config: ScanConfig,
	) -> Result<Self, SmcError> {
		Ok(Self {
			source,
			strategy: Strategy::new(smc_config)?,
			distributor: Distributor::new(config.channel_capacity),
			config,
			scanned: AtomicU64::new(0),
			ready: AtomicU64::new(0),
			insufficient: AtomicU64::new(0),
			failed: AtomicU64::new(0),
			flips: AtomicU64::new(0),
		})
	}

	/// 订阅指定周期的状态翻转。
	pub fn subscribe(&self, timeframe: Timeframe) -> broadcast::Receiver<SharedFlip> {
		self.distributor.subscribe(timeframe)
	}

	pub fn subscriber_count(&self, timeframe: Timeframe) -> usize {
		self.distributor.subscriber_count(timeframe)
	}

	/// 执行一轮扫描。
	///
	/// 每个任务独占自己的 K 线缓冲区；结果按 `jobs` 顺序汇总。
	pub fn scan(&self, jobs: &[ScanJob], previous: &HashMap<ScanKey, MarketState>) -> ScanReport {
		let outcomes = self.run_jobs(jobs);
		let mut report = ScanReport::default();

		for (job, outcome) in jobs.iter().zip(outcomes) {
			self.scanned.fetch_add(1, Ordering::Relaxed);
			match outcome {
				JobOutcome::Ready { state, price } => {
					self.ready.fetch_add(1, Ordering::Relaxed);
					let key = job.key();
					if let Some(flip) = detect_flip(job, previous.get(&key).copied(), state, price) {
						warn!(
							symbol = %flip.symbol,
							timeframe = %flip.timeframe,
							from = %flip.from,
							to = %flip.to,
							"state flip"
						);
						self.flips.fetch_add(1, Ordering::Relaxed);
						self.distributor.broadcast(Arc::new(flip.clone()));
						report.flips.push(flip);
					}
					report.states.insert(key, state);
				}
				JobOutcome::Insufficient => {
					self.insufficient.fetch_add(1, Ordering::Relaxed);
					report.insufficient.push(job.key());
				}
				JobOutcome::Failed(error) => {
					self.failed.fetch_add(1, Ordering::Relaxed);
					warn!(%error, "scan job failed");
					report.failures.push(error);
				}
			}
		}

		info!(
			jobs = jobs.len(),
			ready = report.states.len(),
			insufficient = report.insufficient.len(),
			failed = report.failures.len(),
			flips = report.flips.len(),
			"scan finished"
		);
		report
	}

	/// 返回当前指标快照。
	pub fn metrics(&self) -> ScanMetrics {
		ScanMetrics {
			scanned: self.scanned.load(Ordering::Relaxed),
			ready: self.ready.load(Ordering::Relaxed),
			insufficient: self.insufficient.load(Ordering::Relaxed),
			failed: self.failed.load(Ordering::Relaxed),
			flips: self.flips.load(Ordering::Relaxed),
		}
	}

	fn run_jobs(&self, jobs: &[ScanJob]) -> Vec<JobOutcome> {
		let (job_tx, job_rx) = channel::unbounded::<(usize, &ScanJob)>();
		let (out_tx, out_rx) = channel::unbounded::<(usize, JobOutcome)>();
		for item in jobs.iter().enumerate() {
			let _ = job_tx.send(item);
		}
		drop(job_tx);

		let workers = self.config.workers.max(1).min(jobs.len().max(1));
		thread::scope(|scope| {
			for index in 0..workers {
				let job_rx = job_rx.clone();
				let out_tx = out_tx.clone();
				let spawned = thread::Builder::new()
					.name(format!("scan-worker-{index}"))
					.spawn_scoped(scope, move || {
						while let Ok((slot, job)) = job_rx.recv() {
							let _ = out_tx.send((slot, self.run_job(job)));
						}
					});
				if let Err(error) = spawned {
					warn!(%error, "failed to spawn scan worker");
				}
			}
		});
		drop(out_tx);

		let mut slots: Vec<Option<JobOutcome>> = jobs.iter().map(|_| None).collect();
		for (slot, outcome) in out_rx.try_iter() {
			slots[slot] = Some(outcome);
		}
		// Jobs left over when no worker could be spawned run inline.
		slots
			.into_iter()
			.zip(jobs)
			.map(|(outcome, job)| outcome.unwrap_or_else(|| self.run_job(job)))
			.collect()
	}

	fn run_job(&self, job: &ScanJob) -> JobOutcome {
		let candles = match self.source.fetch(&job.symbol, job.timeframe) {
			Ok(candles) => candles,
			Err(message) => {
				return JobOutcome::Failed(ScanError::Source {
					symbol: job.symbol.clone(),
					timeframe: job.timeframe,
					message,
				});
			}
		};

		match self
			.strategy
			.evaluate_candles(&job.symbol, job.timeframe, candles)
		{
			Ok(StrategyReport::Ready(summary)) => {
				debug!(symbol = %job.symbol, timeframe = %job.timeframe, state = %summary.state, "job ready");
				JobOutcome::Ready {
					state: summary.state,
					price: summary.price,
				}
			}
			Ok(StrategyReport::Unavailable { .. }) => JobOutcome::Insufficient,
			Err(source) => JobOutcome::Failed(ScanError::Analysis {
				symbol: job.symbol.clone(),
				timeframe: job.timeframe,
				source,
			}),
		}
	}
}

/// 仅当上一轮状态已知、状态改变且新状态非中性时才算翻转。
fn detect_flip(
	job: &ScanJob,
	previous: Option<MarketState>,
	current: MarketState,
	price: f64,
) -> Option<StateFlip> {
	let from = previous?;
	if from == current || current == MarketState::Neutral {
		return None;
	}
	Some(StateFlip {
		symbol: job.symbol.clone(),
		timeframe: job.timeframe,
		from,
		to: current,
		price,
	})
}
