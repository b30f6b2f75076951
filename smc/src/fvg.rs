use crate::candle::{Candle, PriceZone};
use crate::constant::ZoneSide;

/// Bars in the imbalance pattern.
pub const FVG_PATTERN_WIDTH: usize = 3;

/// Scans every triple `(i-2, i-1, i)` and marks the middle bar when the
/// outer bars' ranges do not overlap.
///
/// `low[i-2] > high[i]` marks a bullish gap with band `(low[i-2], high[i])`;
/// `high[i-2] < low[i]` marks a bearish gap with band `(high[i-2], low[i])`.
/// Gaps are never tracked for fill.
pub fn detect_fair_value_gaps(candles: &[Candle]) -> Vec<Option<PriceZone>> {
    let mut gaps: Vec<Option<PriceZone>> = vec![None; candles.len()];

    for (first_index, bars) in candles.windows(FVG_PATTERN_WIDTH).enumerate() {
        let (left, right) = (&bars[0], &bars[2]);

        let zone = if left.low > right.high {
            Some(PriceZone {
                side: ZoneSide::Bullish,
                top: left.low,
                bottom: right.high,
            })
        } else if left.high < right.low {
            Some(PriceZone {
                side: ZoneSide::Bearish,
                top: left.high,
                bottom: right.low,
            })
        } else {
            None
        };

        if zone.is_some() {
            gaps[first_index + 1] = zone;
        }
    }

    gaps
}
