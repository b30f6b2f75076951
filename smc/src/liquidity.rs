use crate::candle::Candle;
use crate::constant::Sweep;

/// Flags wick-through-and-reject bars against the previous `window` bars.
///
/// A bar whose high pierces the recent high but closes back under it is
/// `SweptDown`; a bar whose low pierces the recent low but closes back above
/// it is `SweptUp`. The sell-side check runs last, so a bar satisfying both
/// ends up `SweptUp`. Bars with fewer than `window` predecessors stay `None`.
pub fn detect_sweeps(candles: &[Candle], window: usize) -> Vec<Sweep> {
    let mut sweeps = vec![Sweep::None; candles.len()];
    if window == 0 {
        return sweeps;
    }

    for index in window..candles.len() {
        let recent = &candles[index - window..index];
        let recent_high = recent.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let recent_low = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let bar = &candles[index];

        if bar.high > recent_high && bar.close < recent_high {
            sweeps[index] = Sweep::SweptDown;
        }
        if bar.low < recent_low && bar.close > recent_low {
            sweeps[index] = Sweep::SweptUp;
        }
    }

    sweeps
}
