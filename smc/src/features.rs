use serde::{Deserialize, Serialize};

use crate::annotated::{AnnotatedBar, AnnotatedSeries};
use crate::config::SmcConfig;
use crate::constant::{EntryTag, StructureSignal, ZoneSide};
use crate::utils::last_n;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBlockKind {
    BullishOb,
    BearishOb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityKind {
    BuySideLiquidity,
    SellSideLiquidity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    BullishFvg,
    BearishFvg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    BullishBos,
    BearishBos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBlockFeature {
    #[serde(rename = "type")]
    pub kind: OrderBlockKind,
    pub high: f64,
    pub low: f64,
    pub time: i64,
    pub strength: String,
}

impl OrderBlockFeature {
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityZone {
    #[serde(rename = "type")]
    pub kind: LiquidityKind,
    pub price: f64,
    pub time: i64,
    pub strength: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairValueGapFeature {
    #[serde(rename = "type")]
    pub kind: GapKind,
    pub top: f64,
    pub bottom: f64,
    pub time: i64,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakOfStructure {
    #[serde(rename = "type")]
    pub kind: BreakKind,
    pub price: f64,
    pub time: i64,
    pub strength: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub time: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<EntryTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingSignals {
    pub entry_long: Vec<SignalEvent>,
    pub entry_short: Vec<SignalEvent>,
    pub exit_long: Vec<SignalEvent>,
    pub exit_short: Vec<SignalEvent>,
}

impl TradingSignals {
    pub fn is_empty(&self) -> bool {
        self.entry_long.is_empty()
            && self.entry_short.is_empty()
            && self.exit_long.is_empty()
            && self.exit_short.is_empty()
    }
}

/// Payload handed to formatting and notification layers. Every list is
/// ordered oldest first and capped to its most recent items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmcFeatures {
    pub order_blocks: Vec<OrderBlockFeature>,
    pub liquidity_zones: Vec<LiquidityZone>,
    pub fair_value_gaps: Vec<FairValueGapFeature>,
    pub break_of_structure: Vec<BreakOfStructure>,
    pub trading_signals: TradingSignals,
}

impl SmcFeatures {
    pub fn is_empty(&self) -> bool {
        self.order_blocks.is_empty()
            && self.liquidity_zones.is_empty()
            && self.fair_value_gaps.is_empty()
            && self.break_of_structure.is_empty()
            && self.trading_signals.is_empty()
    }

    pub fn latest_break(&self) -> Option<&BreakOfStructure> {
        self.break_of_structure.last()
    }
}

pub fn extract(series: &AnnotatedSeries, config: &SmcConfig) -> SmcFeatures {
    let bars = series.bars();

    let mut order_blocks = Vec::new();
    let mut liquidity_zones = Vec::new();
    let mut fair_value_gaps = Vec::new();
    let mut break_of_structure = Vec::new();

    for bar in bars {
        let time = bar.candle.unix_seconds();

        if let Some(zone) = bar.order_block {
            order_blocks.push(OrderBlockFeature {
                kind: match zone.side {
                    ZoneSide::Bullish => OrderBlockKind::BullishOb,
                    ZoneSide::Bearish => OrderBlockKind::BearishOb,
                },
                high: zone.top,
                low: zone.bottom,
                time,
                strength: "high".to_string(),
            });
        }

        if bar.is_swing_high {
            liquidity_zones.push(LiquidityZone {
                kind: LiquidityKind::BuySideLiquidity,
                price: bar.candle.high,
                time,
                strength: "high".to_string(),
            });
        }
        if bar.is_swing_low {
            liquidity_zones.push(LiquidityZone {
                kind: LiquidityKind::SellSideLiquidity,
                price: bar.candle.low,
                time,
                strength: "high".to_string(),
            });
        }

        if let Some(zone) = bar.fvg {
            fair_value_gaps.push(FairValueGapFeature {
                kind: match zone.side {
                    ZoneSide::Bullish => GapKind::BullishFvg,
                    ZoneSide::Bearish => GapKind::BearishFvg,
                },
                top: zone.top,
                bottom: zone.bottom,
                time,
                filled: false,
            });
        }

        let kind = match bar.structure_signal {
            StructureSignal::BosUp => Some(BreakKind::BullishBos),
            StructureSignal::BosDown => Some(BreakKind::BearishBos),
            _ => None,
        };
        if let Some(kind) = kind {
            break_of_structure.push(BreakOfStructure {
                kind,
                price: bar.candle.close,
                time,
                strength: "confirmed".to_string(),
            });
        }
    }

    SmcFeatures {
        order_blocks: last_n(&order_blocks, config.max_order_blocks),
        liquidity_zones: last_n(&liquidity_zones, config.max_liquidity_zones),
        fair_value_gaps: last_n(&fair_value_gaps, config.max_fair_value_gaps),
        break_of_structure: last_n(&break_of_structure, config.max_breaks),
        trading_signals: trailing_signals(bars, config.signal_window),
    }
}

fn trailing_signals(bars: &[AnnotatedBar], window: usize) -> TradingSignals {
    let mut signals = TradingSignals::default();
    let start = bars.len().saturating_sub(window);

    for bar in &bars[start..] {
        let time = bar.candle.unix_seconds();
        let price = bar.candle.close;
        if bar.enter_long {
            signals.entry_long.push(SignalEvent {
                time,
                price,
                tag: bar.entry_tag,
            });
        }
        if bar.enter_short {
            signals.entry_short.push(SignalEvent {
                time,
                price,
                tag: bar.entry_tag,
            });
        }
        if bar.exit_long {
            signals.exit_long.push(SignalEvent { time, price, tag: None });
        }
        if bar.exit_short {
            signals.exit_short.push(SignalEvent { time, price, tag: None });
        }
    }

    signals
}
