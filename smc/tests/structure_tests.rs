use chrono::{Duration, TimeZone, Utc};

use smc::{
    fibonacci_levels, track_structure, Candle, Direction, StructureRules, StructureSignal,
    StructureState,
};

fn bar(i: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Candle::new(start + Duration::hours(i), open, high, low, close, 1.0)
}

fn rally() -> Vec<Candle> {
    vec![
        bar(0, 10.0, 11.0, 9.0, 10.5),
        bar(1, 10.5, 11.5, 10.4, 11.2),
        bar(2, 11.2, 11.4, 10.9, 11.0),
        bar(3, 11.0, 12.0, 10.9, 11.9),
        bar(4, 11.9, 11.9, 8.0, 8.5),
    ]
}

fn random_walk(len: usize, mut seed: u64) -> Vec<Candle> {
    let mut next = move || {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (seed >> 33) as f64 / (1u64 << 31) as f64
    };
    let mut close = 100.0;
    (0..len)
        .map(|i| {
            let open = close;
            close = open + (next() - 0.5) * 2.0;
            let high = open.max(close) + next() * 0.5;
            let low = open.min(close) - next() * 0.5;
            bar(i as i64, open, high, low, close)
        })
        .collect()
}

#[test]
fn first_break_is_choch_then_bos() {
    let run = track_structure(&rally()[..4], StructureRules::default());

    assert_eq!(
        run.signals,
        vec![
            StructureSignal::None,
            StructureSignal::ChochUp,
            StructureSignal::None,
            StructureSignal::BosUp,
        ]
    );
    assert_eq!(run.breaks.len(), 2);
    assert_eq!(run.breaks[0].level, 11.0);
    assert_eq!(run.breaks[0].origin_index, 0);
    assert_eq!(run.breaks[1].level, 11.5);
    assert_eq!(run.breaks[1].origin_index, 1);

    let state = run.state.unwrap();
    assert_eq!(state.direction, Direction::Bullish);
    assert_eq!(state.structure_high, 12.0);
    assert_eq!(state.structure_high_index, 3);
    assert_eq!(state.structure_low, 9.0);
    assert_eq!(state.structure_low_index, 0);
}

#[test]
fn bearish_series_starts_with_choch_down() {
    let candles = vec![
        bar(0, 10.0, 11.0, 9.0, 9.5),
        bar(1, 9.5, 9.6, 8.5, 8.8),
        bar(2, 8.8, 8.9, 8.0, 8.2),
    ];
    let run = track_structure(&candles, StructureRules::default());

    assert_eq!(
        run.signals,
        vec![
            StructureSignal::None,
            StructureSignal::ChochDown,
            StructureSignal::BosDown,
        ]
    );
    let state = run.state.unwrap();
    assert_eq!(state.direction, Direction::Bearish);
    assert_eq!(state.structure_low, 8.0);
    assert_eq!(state.structure_high, 11.0);
}

#[test]
fn established_trend_ignores_opposite_close_by_default() {
    let run = track_structure(&rally(), StructureRules::default());

    assert_eq!(run.signals[4], StructureSignal::None);
    let state = run.state.unwrap();
    assert_eq!(state.direction, Direction::Bullish);
    assert_eq!(state.structure_low, 9.0);
}

#[test]
fn reversals_can_be_enabled() {
    let rules = StructureRules {
        allow_reversals: true,
        ..StructureRules::default()
    };
    let run = track_structure(&rally(), rules);

    assert_eq!(run.signals[4], StructureSignal::ChochDown);
    let last = run.breaks.last().unwrap();
    assert_eq!(last.level, 9.0);
    let state = run.state.unwrap();
    assert_eq!(state.direction, Direction::Bearish);
    assert_eq!(state.structure_low, 8.0);
    assert_eq!(state.structure_high, 12.0);
    assert_eq!(state.structure_high_index, 3);
}

#[test]
fn breaks_cross_pre_transition_extremes() {
    for allow_reversals in [false, true] {
        let rules = StructureRules {
            allow_reversals,
            ..StructureRules::default()
        };
        let candles = random_walk(400, 7);
        let mut state = StructureState::seed(&candles[0]);

        for index in 1..candles.len() {
            let (next, signal) = state.transition(&candles, index, rules);
            let close = candles[index].close;
            if signal.is_up() {
                assert!(close > state.structure_high, "bar {index}");
            }
            if signal.is_down() {
                assert!(close < state.structure_low, "bar {index}");
            }
            if !signal.is_break() {
                if state.direction == Direction::Bullish {
                    assert!(next.structure_high >= state.structure_high, "bar {index}");
                }
                if state.direction == Direction::Bearish {
                    assert!(next.structure_low <= state.structure_low, "bar {index}");
                }
            }
            state = next;
        }
    }
}

#[test]
fn fibonacci_follows_final_direction() {
    let mut state = StructureState::seed(&bar(0, 105.0, 110.0, 100.0, 105.0));
    state.direction = Direction::Bullish;
    let levels = fibonacci_levels(&state);
    assert_eq!(levels.len(), 5);
    assert!((levels[1].price - 105.0).abs() < 1e-9);
    assert!((levels[0].price - 106.18).abs() < 1e-9);

    state.direction = Direction::Bearish;
    let levels = fibonacci_levels(&state);
    assert!((levels[0].price - 103.82).abs() < 1e-9);

    let flat = StructureState::seed(&bar(0, 100.0, 100.0, 100.0, 100.0));
    assert!(fibonacci_levels(&flat).is_empty());
}
