use chrono::{Duration, TimeZone, Utc};

use smc::{
    detect_fair_value_gaps, detect_sweeps, locate_order_blocks, Candle, PriceZone,
    StructureSignal, Sweep, ZoneSide,
};

fn bar(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Candle::new(start + Duration::minutes(15 * i as i64), open, high, low, close, 1.0)
}

fn rising(len: usize) -> Vec<Candle> {
    (0..len).map(|i| bar(i, 10.0, 13.0, 10.0, 12.0)).collect()
}

fn falling_at(candles: &mut [Candle], index: usize) {
    candles[index] = bar(index, 12.0, 12.5, 10.5, 11.0);
}

fn signals_with(len: usize, at: &[(usize, StructureSignal)]) -> Vec<StructureSignal> {
    let mut signals = vec![StructureSignal::None; len];
    for &(index, signal) in at {
        signals[index] = signal;
    }
    signals
}

#[test]
fn order_block_takes_nearest_opposite_candle() {
    let mut candles = rising(15);
    falling_at(&mut candles, 5);
    falling_at(&mut candles, 9);
    let signals = signals_with(15, &[(12, StructureSignal::BosUp)]);

    let blocks = locate_order_blocks(&candles, &signals, 10);

    assert_eq!(
        blocks[9],
        Some(PriceZone {
            side: ZoneSide::Bullish,
            top: 12.5,
            bottom: 10.5,
        })
    );
    assert_eq!(blocks.iter().filter(|b| b.is_some()).count(), 1);
}

#[test]
fn order_block_scan_is_bounded() {
    let mut candles = rising(15);
    falling_at(&mut candles, 1);
    let signals = signals_with(15, &[(12, StructureSignal::ChochUp)]);
    assert!(locate_order_blocks(&candles, &signals, 10)
        .iter()
        .all(Option::is_none));

    falling_at(&mut candles, 2);
    let blocks = locate_order_blocks(&candles, &signals, 10);
    assert!(blocks[2].is_some());
    assert!(blocks[1].is_none());
}

#[test]
fn down_break_marks_last_bullish_candle() {
    let mut candles = rising(8);
    falling_at(&mut candles, 6);
    let signals = signals_with(8, &[(7, StructureSignal::BosDown)]);

    let blocks = locate_order_blocks(&candles, &signals, 10);
    assert_eq!(blocks[5].map(|z| z.side), Some(ZoneSide::Bearish));
    assert!(blocks[6].is_none());
}

#[test]
fn shared_origin_keeps_first_block() {
    let mut candles = rising(15);
    falling_at(&mut candles, 9);
    let signals = signals_with(
        15,
        &[(11, StructureSignal::ChochUp), (13, StructureSignal::BosUp)],
    );

    let blocks = locate_order_blocks(&candles, &signals, 10);
    assert_eq!(blocks.iter().filter(|b| b.is_some()).count(), 1);
    assert!(blocks[9].is_some());
}

fn flat(len: usize) -> Vec<Candle> {
    (0..len).map(|i| bar(i, 11.0, 13.0, 10.0, 12.0)).collect()
}

#[test]
fn bullish_gap_marks_middle_bar_only() {
    let mut candles = flat(10);
    candles[4] = bar(4, 12.5, 14.0, 12.0, 13.5);
    candles[5] = bar(5, 11.0, 12.5, 10.5, 12.0);
    candles[6] = bar(6, 10.5, 11.5, 10.0, 11.0);

    let gaps = detect_fair_value_gaps(&candles);

    assert!(gaps[4].is_none());
    assert!(gaps[6].is_none());
    assert_eq!(
        gaps[5],
        Some(PriceZone {
            side: ZoneSide::Bullish,
            top: 12.0,
            bottom: 11.5,
        })
    );
    assert_eq!(gaps.iter().filter(|g| g.is_some()).count(), 1);
}

#[test]
fn bearish_gap_marks_middle_bar_only() {
    let mut candles = flat(10);
    candles[4] = bar(4, 10.0, 10.5, 9.0, 10.2);
    candles[5] = bar(5, 10.5, 12.0, 10.0, 11.5);
    candles[6] = bar(6, 11.5, 13.0, 11.0, 12.5);

    let gaps = detect_fair_value_gaps(&candles);

    assert_eq!(
        gaps[5],
        Some(PriceZone {
            side: ZoneSide::Bearish,
            top: 10.5,
            bottom: 11.0,
        })
    );
    assert_eq!(gaps.iter().filter(|g| g.is_some()).count(), 1);
}

#[test]
fn sweeps_need_full_history() {
    let mut candles = flat(10);
    for i in 1..5 {
        let low = 10.0 - i as f64;
        candles[i] = bar(i, 11.0, 13.0, low, 12.0);
    }

    let sweeps = detect_sweeps(&candles, 5);
    assert!(sweeps[..5].iter().all(|s| *s == Sweep::None));
}

#[test]
fn first_sweep_can_land_on_window_index() {
    let mut candles = flat(8);
    candles[4] = bar(4, 11.0, 13.0, 9.5, 12.0);
    candles[5] = bar(5, 11.0, 13.0, 9.0, 12.0);

    let sweeps = detect_sweeps(&candles, 5);
    assert_eq!(sweeps[4], Sweep::None);
    assert_eq!(sweeps[5], Sweep::SweptUp);
}

#[test]
fn sweep_direction_follows_rejected_wick() {
    let mut candles = flat(12);
    candles[6] = bar(6, 11.0, 13.5, 10.0, 12.0);
    candles[9] = bar(9, 11.0, 13.0, 9.5, 12.0);

    let sweeps = detect_sweeps(&candles, 5);
    assert_eq!(sweeps[6], Sweep::SweptDown);
    assert_eq!(sweeps[9], Sweep::SweptUp);
    assert_eq!(sweeps.iter().filter(|s| **s != Sweep::None).count(), 2);
}

#[test]
fn wide_bar_sweeping_both_sides_reads_as_swept_up() {
    let mut candles = flat(8);
    candles[6] = bar(6, 11.0, 14.0, 9.0, 12.0);

    let sweeps = detect_sweeps(&candles, 5);
    assert_eq!(sweeps[6], Sweep::SweptUp);
}
