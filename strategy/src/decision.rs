use std::fmt::{Display, Formatter};

use serde::Serialize;
use smc::{BreakKind, LiquidityKind, OrderBlockKind, SmcFeatures};

const STRENGTH_CAP: f64 = 10.0;

/// Simplified stance used to detect flips between scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MarketState {
    Long,
    Short,
    #[default]
    Neutral,
}

impl MarketState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "Long",
            Self::Short => "Short",
            Self::Neutral => "Neutral",
        }
    }
}

impl Display for MarketState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    StrongSell,
    Sell,
    Hold,
}

impl Recommendation {
    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::StrongSell => "STRONG SELL",
            Self::Sell => "SELL",
            Self::Hold => "HOLD/WAIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Suggestion {
    ConfirmedBullish,
    ConfirmedBearish,
    BuySignal,
    SellSignal,
}

impl Suggestion {
    pub fn message(self) -> &'static str {
        match self {
            Self::ConfirmedBullish => "bullish structure confirmed",
            Self::ConfirmedBearish => "bearish structure confirmed",
            Self::BuySignal => "long entry signal detected",
            Self::SellSignal => "short entry signal detected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyLevelKind {
    OrderBlock,
    Liquidity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyLevel {
    #[serde(rename = "type")]
    pub kind: KeyLevelKind,
    pub price: f64,
    /// Feature type the level came from, e.g. `bullish_ob`.
    pub direction: String,
}

#[derive(Debug, Default)]
pub struct DecisionEngine;

impl DecisionEngine {
    /// Live entry signals win; otherwise the latest BOS sets the state.
    pub fn market_state(&self, features: &SmcFeatures) -> MarketState {
        let signals = &features.trading_signals;
        if !signals.entry_long.is_empty() {
            return MarketState::Long;
        }
        if !signals.entry_short.is_empty() {
            return MarketState::Short;
        }
        match self.trend(features) {
            Trend::Bullish => MarketState::Long,
            Trend::Bearish => MarketState::Short,
            Trend::Neutral => MarketState::Neutral,
        }
    }

    pub fn trend(&self, features: &SmcFeatures) -> Trend {
        match features.latest_break().map(|b| b.kind) {
            Some(BreakKind::BullishBos) => Trend::Bullish,
            Some(BreakKind::BearishBos) => Trend::Bearish,
            None => Trend::Neutral,
        }
    }

    pub fn signal_strength(&self, features: &SmcFeatures, rsi: f64) -> f64 {
        let mut strength = features.break_of_structure.len() as f64 * 0.3
            + features.fair_value_gaps.len() as f64 * 0.2
            + features.order_blocks.len() as f64 * 0.1;
        if rsi > 70.0 || rsi < 30.0 {
            strength += 0.5;
        }
        strength.min(STRENGTH_CAP)
    }

    pub fn recommend(&self, signal_strength: f64, rsi: f64) -> Recommendation {
        if signal_strength > 7.0 && rsi < 30.0 {
            Recommendation::StrongBuy
        } else if signal_strength > 5.0 && rsi < 40.0 {
            Recommendation::Buy
        } else if signal_strength > 7.0 && rsi > 70.0 {
            Recommendation::StrongSell
        } else if signal_strength > 5.0 && rsi > 60.0 {
            Recommendation::Sell
        } else {
            Recommendation::Hold
        }
    }

    /// Empty means the market is ranging.
    pub fn suggestions(&self, features: &SmcFeatures) -> Vec<Suggestion> {
        let mut out = Vec::new();
        match self.trend(features) {
            Trend::Bullish => out.push(Suggestion::ConfirmedBullish),
            Trend::Bearish => out.push(Suggestion::ConfirmedBearish),
            Trend::Neutral => {}
        }
        if !features.trading_signals.entry_long.is_empty() {
            out.push(Suggestion::BuySignal);
        }
        if !features.trading_signals.entry_short.is_empty() {
            out.push(Suggestion::SellSignal);
        }
        out
    }

    /// Midpoints of the last three order blocks, then the last three liquidity zones.
    pub fn key_levels(&self, features: &SmcFeatures) -> Vec<KeyLevel> {
        let blocks = &features.order_blocks[features.order_blocks.len().saturating_sub(3)..];
        let zones = &features.liquidity_zones[features.liquidity_zones.len().saturating_sub(3)..];

        let block_levels = blocks.iter().map(|ob| KeyLevel {
            kind: KeyLevelKind::OrderBlock,
            price: ob.midpoint(),
            direction: match ob.kind {
                OrderBlockKind::BullishOb => "bullish_ob",
                OrderBlockKind::BearishOb => "bearish_ob",
            }
            .to_string(),
        });
        let zone_levels = zones.iter().map(|lz| KeyLevel {
            kind: KeyLevelKind::Liquidity,
            price: lz.price,
            direction: match lz.kind {
                LiquidityKind::BuySideLiquidity => "buy_side_liquidity",
                LiquidityKind::SellSideLiquidity => "sell_side_liquidity",
            }
            .to_string(),
        });

        block_levels.chain(zone_levels).collect()
    }
}
