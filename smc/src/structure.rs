use serde::Serialize;
use tracing::trace;

use crate::candle::Candle;
use crate::constant::{Direction, StructureSignal};
use crate::utils::{first_max_index, first_min_index};

pub const FIBONACCI_RATIOS: [f64; 5] = [0.382, 0.5, 0.618, 0.705, 0.786];

/// Tracked extremes and trend of one structure pass.
///
/// Created from the first bar, advanced bar-by-bar through
/// [`StructureState::transition`], discarded when the pass ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructureState {
    pub structure_high: f64,
    pub structure_low: f64,
    pub structure_high_index: usize,
    pub structure_low_index: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureRules {
    /// Trailing bars (current excluded) that re-seed the opposite extreme on a break.
    pub window: usize,
    pub allow_reversals: bool,
}

impl Default for StructureRules {
    fn default() -> Self {
        Self {
            window: 10,
            allow_reversals: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructureBreak {
    pub index: usize,
    pub signal: StructureSignal,
    pub level: f64,
    /// Bar where the broken extreme had been set.
    pub origin_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureRun {
    pub signals: Vec<StructureSignal>,
    pub breaks: Vec<StructureBreak>,
    pub state: Option<StructureState>,
}

impl StructureState {
    pub fn seed(first: &Candle) -> Self {
        Self {
            structure_high: first.high,
            structure_low: first.low,
            structure_high_index: 0,
            structure_low_index: 0,
            direction: Direction::Undetermined,
        }
    }

    /// Advances the state over bar `index` (`index >= 1`).
    ///
    /// Breaks are judged on the close against the current extremes and take
    /// precedence over extending the range. A high break re-seeds the low from
    /// the trailing window, a low break re-seeds the high.
    pub fn transition(
        &self,
        candles: &[Candle],
        index: usize,
        rules: StructureRules,
    ) -> (Self, StructureSignal) {
        let bar = &candles[index];
        let start = index.saturating_sub(rules.window);
        let window = &candles[start..index];
        let mut next = *self;

        let is_high_broken = bar.close > self.structure_high;
        let is_low_broken = bar.close < self.structure_low;
        let can_break_up = self.direction != Direction::Bearish || rules.allow_reversals;
        let can_break_down = self.direction != Direction::Bullish || rules.allow_reversals;
        let tracks_high = self.direction != Direction::Bearish;
        let tracks_low = self.direction != Direction::Bullish;

        if can_break_up && is_high_broken {
            let signal = if self.direction == Direction::Bullish {
                StructureSignal::BosUp
            } else {
                StructureSignal::ChochUp
            };
            next.direction = Direction::Bullish;
            next.structure_high = bar.high;
            next.structure_high_index = index;
            if let Some((offset, low)) = first_min_index(window.iter().map(|c| c.low)) {
                next.structure_low = low;
                next.structure_low_index = start + offset;
            }
            return (next, signal);
        }

        if can_break_down && is_low_broken {
            let signal = if self.direction == Direction::Bearish {
                StructureSignal::BosDown
            } else {
                StructureSignal::ChochDown
            };
            next.direction = Direction::Bearish;
            next.structure_low = bar.low;
            next.structure_low_index = index;
            if let Some((offset, high)) = first_max_index(window.iter().map(|c| c.high)) {
                next.structure_high = high;
                next.structure_high_index = start + offset;
            }
            return (next, signal);
        }

        if tracks_high && bar.high > self.structure_high {
            next.structure_high = bar.high;
            next.structure_high_index = index;
        } else if tracks_low && bar.low < self.structure_low {
            next.structure_low = bar.low;
            next.structure_low_index = index;
        }
        (next, StructureSignal::None)
    }
}

pub fn track_structure(candles: &[Candle], rules: StructureRules) -> StructureRun {
    let Some(first) = candles.first() else {
        return StructureRun::default();
    };

    let mut state = StructureState::seed(first);
    let mut signals = Vec::with_capacity(candles.len());
    let mut breaks = Vec::new();
    signals.push(StructureSignal::None);

    for index in 1..candles.len() {
        let (next, signal) = state.transition(candles, index, rules);
        if signal.is_break() {
            let (level, origin_index) = if signal.is_up() {
                (state.structure_high, state.structure_high_index)
            } else {
                (state.structure_low, state.structure_low_index)
            };
            trace!(index, ?signal, level, "structure break");
            breaks.push(StructureBreak {
                index,
                signal,
                level,
                origin_index,
            });
        }
        signals.push(signal);
        state = next;
    }

    StructureRun {
        signals,
        breaks,
        state: Some(state),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

/// Retracement levels of the final structural range: measured down from the
/// high in a bullish structure, up from the low otherwise. A degenerate
/// (zero or inverted) range yields no levels.
pub fn fibonacci_levels(state: &StructureState) -> Vec<FibonacciLevel> {
    let range = state.structure_high - state.structure_low;
    if !range.is_finite() || range <= 0.0 {
        return Vec::new();
    }

    FIBONACCI_RATIOS
        .iter()
        .map(|&ratio| FibonacciLevel {
            ratio,
            price: if state.direction == Direction::Bullish {
                state.structure_high - range * ratio
            } else {
                state.structure_low + range * ratio
            },
        })
        .collect()
}
