use crate::candle::{Candle, PriceZone};
use crate::constant::{StructureSignal, ZoneSide};
use crate::utils::find_nearest;

/// For every break, marks the nearest opposite-colored candle within
/// `scan` bars before it as an order block with its `(high, low)` band.
///
/// Upward breaks look for a bearish candle and mark a bullish block;
/// downward breaks the reverse. A bar keeps the first block assigned to it.
pub fn locate_order_blocks(
    candles: &[Candle],
    signals: &[StructureSignal],
    scan: usize,
) -> Vec<Option<PriceZone>> {
    let mut blocks: Vec<Option<PriceZone>> = vec![None; candles.len()];

    for (index, signal) in signals.iter().enumerate().take(candles.len()) {
        let (side, found) = if signal.is_up() {
            (
                ZoneSide::Bullish,
                find_nearest(candles, index, scan, Candle::is_bearish),
            )
        } else if signal.is_down() {
            (
                ZoneSide::Bearish,
                find_nearest(candles, index, scan, Candle::is_bullish),
            )
        } else {
            continue;
        };

        let Some(origin) = found else {
            continue;
        };
        if blocks[origin].is_none() {
            blocks[origin] = Some(PriceZone {
                side,
                top: candles[origin].high,
                bottom: candles[origin].low,
            });
        }
    }

    blocks
}
