use chrono::{Duration, TimeZone, Utc};

use smc::{
    BreakKind, BreakOfStructure, Candle, EntryTag, FairValueGapFeature, GapKind, LiquidityKind,
    LiquidityZone, OrderBlockFeature, OrderBlockKind, SignalEvent, SmcConfig, SmcFeatures,
    Timeframe,
};
use strategy::{
    DecisionEngine, KeyLevelKind, MarketState, Recommendation, Strategy, StrategyReport,
    Suggestion, Trend,
};

fn bos(kind: BreakKind, time: i64) -> BreakOfStructure {
    BreakOfStructure {
        kind,
        price: 100.0,
        time,
        strength: "confirmed".to_string(),
    }
}

fn block(kind: OrderBlockKind, high: f64, low: f64) -> OrderBlockFeature {
    OrderBlockFeature {
        kind,
        high,
        low,
        time: 0,
        strength: "high".to_string(),
    }
}

fn zone(kind: LiquidityKind, price: f64) -> LiquidityZone {
    LiquidityZone {
        kind,
        price,
        time: 0,
        strength: "high".to_string(),
    }
}

fn gap() -> FairValueGapFeature {
    FairValueGapFeature {
        kind: GapKind::BullishFvg,
        top: 1.0,
        bottom: 0.5,
        time: 0,
        filled: false,
    }
}

#[test]
fn trend_follows_latest_bos() {
    let engine = DecisionEngine;
    let mut features = SmcFeatures::default();
    assert_eq!(engine.trend(&features), Trend::Neutral);
    assert_eq!(engine.market_state(&features), MarketState::Neutral);
    assert!(engine.suggestions(&features).is_empty());

    features.break_of_structure = vec![bos(BreakKind::BullishBos, 1), bos(BreakKind::BearishBos, 2)];
    assert_eq!(engine.trend(&features), Trend::Bearish);
    assert_eq!(engine.market_state(&features), MarketState::Short);
    assert_eq!(engine.suggestions(&features), vec![Suggestion::ConfirmedBearish]);
}

#[test]
fn entry_signal_overrides_structure() {
    let engine = DecisionEngine;
    let mut features = SmcFeatures::default();
    features.break_of_structure = vec![bos(BreakKind::BearishBos, 1)];
    features.trading_signals.entry_long.push(SignalEvent {
        time: 5,
        price: 101.0,
        tag: Some(EntryTag::LongSmcSimple),
    });

    assert_eq!(engine.market_state(&features), MarketState::Long);
    assert_eq!(
        engine.suggestions(&features),
        vec![Suggestion::ConfirmedBearish, Suggestion::BuySignal]
    );
    let messages: Vec<&str> = engine
        .suggestions(&features)
        .into_iter()
        .map(Suggestion::message)
        .collect();
    assert_eq!(
        messages,
        vec!["bearish structure confirmed", "long entry signal detected"]
    );
}

#[test]
fn strength_weights_and_cap() {
    let engine = DecisionEngine;
    let mut features = SmcFeatures::default();
    features.break_of_structure = vec![bos(BreakKind::BullishBos, 1); 10];
    features.fair_value_gaps = vec![gap(); 20];
    features.order_blocks = vec![block(OrderBlockKind::BullishOb, 2.0, 1.0); 10];

    assert!((engine.signal_strength(&features, 50.0) - 8.0).abs() < 1e-9);
    assert!((engine.signal_strength(&features, 25.0) - 8.5).abs() < 1e-9);

    features.fair_value_gaps = vec![gap(); 40];
    assert_eq!(engine.signal_strength(&features, 80.0), 10.0);
}

#[test]
fn recommendation_thresholds() {
    let engine = DecisionEngine;
    assert_eq!(engine.recommend(7.5, 25.0), Recommendation::StrongBuy);
    assert_eq!(engine.recommend(7.5, 35.0), Recommendation::Buy);
    assert_eq!(engine.recommend(7.5, 75.0), Recommendation::StrongSell);
    assert_eq!(engine.recommend(6.0, 65.0), Recommendation::Sell);
    assert_eq!(engine.recommend(6.0, 50.0), Recommendation::Hold);
    assert_eq!(engine.recommend(4.0, 20.0), Recommendation::Hold);
    assert_eq!(Recommendation::Hold.label(), "HOLD/WAIT");
}

#[test]
fn key_levels_take_last_three_of_each() {
    let engine = DecisionEngine;
    let mut features = SmcFeatures::default();
    features.order_blocks = (0..5)
        .map(|i| block(OrderBlockKind::BearishOb, 10.0 + i as f64, 8.0 + i as f64))
        .collect();
    features.liquidity_zones = vec![zone(LiquidityKind::SellSideLiquidity, 7.0)];

    let levels = engine.key_levels(&features);
    assert_eq!(levels.len(), 4);
    assert_eq!(levels[0].kind, KeyLevelKind::OrderBlock);
    assert_eq!(levels[0].price, 11.0);
    assert_eq!(levels[0].direction, "bearish_ob");
    assert_eq!(levels[3].kind, KeyLevelKind::Liquidity);
    assert_eq!(levels[3].direction, "sell_side_liquidity");
}

fn drift(len: usize) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    (0..len)
        .map(|i| {
            let base = 50.0 + (i % 9) as f64 * 0.7 + i as f64 * 0.05;
            Candle::new(
                start + Duration::hours(4 * i as i64),
                base,
                base + 1.0,
                base - 0.6,
                base + 0.4,
                3.0,
            )
        })
        .collect()
}

#[test]
fn strategy_reports_unavailable_on_short_history() {
    let strategy = Strategy::new(SmcConfig::default()).unwrap();
    let report = strategy
        .evaluate_candles("ETH/USDT", Timeframe::H4, drift(30))
        .unwrap();
    assert_eq!(
        report,
        StrategyReport::Unavailable {
            required: 41,
            actual: 30,
        }
    );
    assert_eq!(report.state(), MarketState::Neutral);
}

#[test]
fn strategy_summarizes_ready_analysis() {
    let strategy = Strategy::new(SmcConfig::default()).unwrap();
    let candles = drift(120);
    let last_close = candles[119].close;
    let report = strategy
        .evaluate_candles("ETH/USDT", Timeframe::H4, candles)
        .unwrap();

    let summary = report.summary().expect("enough history");
    assert_eq!(summary.symbol, "ETH/USDT");
    assert_eq!(summary.price, last_close);
    assert!((0.0..=100.0).contains(&summary.rsi));
    assert!(summary.signal_strength <= 10.0);
    assert!((summary.confidence - summary.signal_strength * 10.0).abs() < 0.01);

    let json = serde_json::to_value(summary).unwrap();
    assert_eq!(json["timeframe"], "4h");
    assert!(json["features"]["order_blocks"].is_array());
}
