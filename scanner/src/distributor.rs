//! 分发模块（fan-out）。
//!
//! 按周期维护广播频道，把状态翻转推送给任意数量的订阅者。

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use smc::Timeframe;
use tokio::sync::broadcast;

use crate::SharedFlip;

/// 翻转事件分发器。
///
/// 每个周期一个 `broadcast` 频道，首次订阅时惰性创建。
#[derive(Debug)]
pub struct Distributor {
	channels: RwLock<HashMap<Timeframe, Arc<broadcast::Sender<SharedFlip>>>>,
	channel_capacity: usize,
}

impl Distributor {
	pub fn new(channel_capacity: usize) -> Self {
		Self {
			channels: RwLock::new(HashMap::new()),
			channel_capacity: channel_capacity.max(1),
		}
	}

	/// 订阅指定周期的翻转事件。
	pub fn subscribe(&self, timeframe: Timeframe) -> broadcast::Receiver<SharedFlip> {
		let mut guard = self.channels.write().unwrap_or_else(PoisonError::into_inner);
		guard
			.entry(timeframe)
			.or_insert_with(|| {
				let (tx, _) = broadcast::channel(self.channel_capacity);
				Arc::new(tx)
			})
			.subscribe()
	}

	/// 广播一条翻转，返回当前接收者数量；无人订阅时直接丢弃。
	pub fn broadcast(&self, flip: SharedFlip) -> usize {
		let guard = self.channels.read().unwrap_or_else(PoisonError::into_inner);
		match guard.get(&flip.timeframe) {
			Some(sender) => {
				let _ = sender.send(flip);
				sender.receiver_count()
			}
			None => 0,
		}
	}

	pub fn subscriber_count(&self, timeframe: Timeframe) -> usize {
		let guard = self.channels.read().unwrap_or_else(PoisonError::into_inner);
		guard
			.get(&timeframe)
			.map(|sender| sender.receiver_count())
			.unwrap_or(0)
	}
}
