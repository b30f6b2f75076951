use crate::candle::Candle;

/// Swing-point flags, parallel to the input candles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwingMarks {
    pub highs: Vec<bool>,
    pub lows: Vec<bool>,
}

impl SwingMarks {
    pub fn empty(len: usize) -> Self {
        Self {
            highs: vec![false; len],
            lows: vec![false; len],
        }
    }
}

/// Marks bar `i` as a swing high when its high equals the max of the
/// centered `[i - lookback, i + lookback]` window (lows symmetric).
///
/// Bars with fewer than `lookback` neighbors on either side are never
/// swing points. Ties are not de-duplicated: every bar matching the
/// window extreme is marked.
pub fn detect_swings(candles: &[Candle], lookback: usize) -> SwingMarks {
    let len = candles.len();
    let mut marks = SwingMarks::empty(len);
    if len < lookback * 2 + 1 {
        return marks;
    }

    for i in lookback..len - lookback {
        let window = &candles[i - lookback..=i + lookback];
        let window_high = window
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let window_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

        marks.highs[i] = candles[i].high == window_high;
        marks.lows[i] = candles[i].low == window_low;
    }

    marks
}
