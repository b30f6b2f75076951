use chrono::{Duration, TimeZone, Utc};

use smc::{detect_swings, Candle};

fn bars(highs: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    highs
        .iter()
        .enumerate()
        .map(|(i, &high)| {
            let low = high - 1.0;
            let mid = (high + low) / 2.0;
            Candle::new(start + Duration::minutes(i as i64), mid, high, low, mid, 1.0)
        })
        .collect()
}

#[test]
fn centered_extremes_are_marked() {
    let candles = bars(&[5.0, 1.0, 2.0, 3.0, 9.0, 3.0, 2.0, 9.0, 1.0, 2.0, 1.0]);
    let marks = detect_swings(&candles, 2);

    let highs: Vec<usize> = (0..candles.len()).filter(|&i| marks.highs[i]).collect();
    assert_eq!(highs, vec![4, 7]);
    let lows: Vec<usize> = (0..candles.len()).filter(|&i| marks.lows[i]).collect();
    assert_eq!(lows, vec![8]);
}

#[test]
fn boundary_bars_are_never_swings() {
    let candles = bars(&[10.0, 2.0, 3.0, 4.0, 3.0, 2.0, 0.5]);
    let marks = detect_swings(&candles, 2);

    assert!(!marks.highs[0]);
    assert!(!marks.lows[6]);
    assert!(marks.highs[3]);
    assert!(!marks.highs[..2].iter().any(|&x| x));
    assert!(!marks.lows[5..].iter().any(|&x| x));
}

#[test]
fn tied_extremes_are_all_marked() {
    let candles = bars(&[1.0, 2.0, 3.0, 7.0, 7.0, 3.0, 2.0, 1.0]);
    let marks = detect_swings(&candles, 2);

    assert!(marks.highs[3]);
    assert!(marks.highs[4]);
}

#[test]
fn series_shorter_than_window_has_no_swings() {
    let candles = bars(&[1.0, 5.0, 1.0, 2.0]);
    let marks = detect_swings(&candles, 2);

    assert_eq!(marks.highs.len(), 4);
    assert!(marks.highs.iter().chain(marks.lows.iter()).all(|&x| !x));
}
