use std::path::PathBuf;

use smc::{
    detect_swings, init_logging, AnalysisOutcome, CandleSeries, SmcConfig, SmcEngine,
    StructureRules, StructureSignal, StructureState, Sweep, ZoneSide,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: cargo run -q -p replay --bin audit_smc -- <csv_path> [config_yaml]");
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let config = match args.get(2) {
        Some(path) => SmcConfig::from_yaml_file(path)?,
        None => SmcConfig::default(),
    };

    let series = CandleSeries::from_csv(&csv_path)?;
    let engine = SmcEngine::new(config.clone())?;
    let outcome = engine.analyze(&series);
    let AnalysisOutcome::Ready(analysis) = &outcome else {
        println!(
            "AUDIT skipped: bars={} required={}",
            series.len(),
            config.min_bars()
        );
        return Ok(());
    };

    let candles = series.candles();
    let bars = analysis.annotated.bars();
    let mut violations: Vec<String> = Vec::new();

    if bars.len() != candles.len() {
        violations.push(format!(
            "annotated length {} differs from input length {}",
            bars.len(),
            candles.len()
        ));
    }

    // swings
    let lookback = config.swing_lookback;
    let swings = detect_swings(candles, lookback);
    for (i, bar) in bars.iter().enumerate() {
        let in_range = i >= lookback && i + lookback < candles.len();
        if !in_range && (bar.is_swing_high || bar.is_swing_low) {
            violations.push(format!("swing marked on boundary bar {}", i));
        }
        if bar.is_swing_high != swings.highs[i] || bar.is_swing_low != swings.lows[i] {
            violations.push(format!("swing flags at {} are not reproducible", i));
        }
        if in_range && bar.is_swing_high {
            let window = &candles[i - lookback..=i + lookback];
            if window.iter().any(|c| c.high > candles[i].high) {
                violations.push(format!("swing high at {} is exceeded inside its window", i));
            }
        }
        if in_range && bar.is_swing_low {
            let window = &candles[i - lookback..=i + lookback];
            if window.iter().any(|c| c.low < candles[i].low) {
                violations.push(format!("swing low at {} is undercut inside its window", i));
            }
        }
    }

    // structure: replay the state machine and check every break crosses the pre-transition extreme
    let rules = StructureRules {
        window: config.structure_window,
        allow_reversals: config.allow_reversals,
    };
    let mut breaks_seen = 0usize;
    if let Some(first) = candles.first() {
        let mut state = StructureState::seed(first);
        if bars[0].structure_signal != StructureSignal::None {
            violations.push("first bar carries a structure signal".to_string());
        }
        for i in 1..candles.len() {
            let (next, signal) = state.transition(candles, i, rules);
            let recorded = bars[i].structure_signal;
            if recorded != signal {
                violations.push(format!(
                    "structure at {} recorded {:?}, replay gives {:?}",
                    i, recorded, signal
                ));
            }
            if signal.is_up() && candles[i].close <= state.structure_high {
                violations.push(format!(
                    "up break at {} closes {} not above {}",
                    i, candles[i].close, state.structure_high
                ));
            }
            if signal.is_down() && candles[i].close >= state.structure_low {
                violations.push(format!(
                    "down break at {} closes {} not below {}",
                    i, candles[i].close, state.structure_low
                ));
            }
            if signal.is_break() {
                breaks_seen += 1;
            }
            state = next;
        }
        if state != analysis.structure {
            violations.push("final structure state differs from replay".to_string());
        }
    }
    if breaks_seen != analysis.breaks.len() {
        violations.push(format!(
            "break list has {} entries, replay found {}",
            analysis.breaks.len(),
            breaks_seen
        ));
    }

    // order blocks
    let mut order_blocks = 0usize;
    for (i, bar) in bars.iter().enumerate() {
        let Some(zone) = bar.order_block else {
            continue;
        };
        order_blocks += 1;
        let candle = &candles[i];
        let colored = match zone.side {
            ZoneSide::Bullish => candle.is_bearish(),
            ZoneSide::Bearish => candle.is_bullish(),
        };
        if !colored {
            violations.push(format!("order block at {} has the wrong candle color", i));
        }
        if zone.top != candle.high || zone.bottom != candle.low {
            violations.push(format!("order block band at {} is not the bar range", i));
        }
        let end = (i + config.order_block_scan).min(candles.len() - 1);
        let confirmed = i < end
            && bars[i + 1..=end].iter().any(|b| match zone.side {
                ZoneSide::Bullish => b.structure_signal.is_up(),
                ZoneSide::Bearish => b.structure_signal.is_down(),
            });
        if !confirmed {
            violations.push(format!("order block at {} has no break within reach", i));
        }
    }

    // fair value gaps
    let mut gaps = 0usize;
    for (i, bar) in bars.iter().enumerate() {
        let Some(zone) = bar.fvg else {
            continue;
        };
        gaps += 1;
        if i == 0 || i + 1 >= candles.len() {
            violations.push(format!("gap marked on edge bar {}", i));
            continue;
        }
        let (left, right) = (&candles[i - 1], &candles[i + 1]);
        let ok = match zone.side {
            ZoneSide::Bullish => left.low > right.high,
            ZoneSide::Bearish => left.high < right.low,
        };
        if !ok {
            violations.push(format!("gap at {} has overlapping outer bars", i));
        }
    }

    // sweeps and signals
    let mut sweeps = 0usize;
    let mut entries = 0usize;
    for (i, bar) in bars.iter().enumerate() {
        if bar.liquidity_sweep != Sweep::None {
            sweeps += 1;
            if i < config.liquidity_window {
                violations.push(format!("sweep at {} before a full lookback", i));
            }
        }

        let touches = |side: ZoneSide| {
            [bar.order_block, bar.fvg]
                .into_iter()
                .flatten()
                .any(|z| z.side == side && z.touched_by(&bar.candle))
        };
        let expect_long = bar.structure_signal == StructureSignal::BosUp
            && bar.liquidity_sweep == Sweep::SweptUp
            && touches(ZoneSide::Bullish);
        let expect_short = bar.structure_signal == StructureSignal::BosDown
            && bar.liquidity_sweep == Sweep::SweptDown
            && touches(ZoneSide::Bearish);
        if bar.enter_long != expect_long || bar.enter_short != expect_short {
            violations.push(format!("entry flags at {} do not match their conditions", i));
        }
        if bar.enter_long || bar.enter_short {
            entries += 1;
            if bar.entry_tag.is_none() {
                violations.push(format!("entry at {} has no tag", i));
            }
        }
        if bar.exit_long != (bar.structure_signal == StructureSignal::ChochDown)
            || bar.exit_short != (bar.structure_signal == StructureSignal::ChochUp)
        {
            violations.push(format!("exit flags at {} do not follow the CHoCH", i));
        }
    }

    if engine.analyze(&series) != outcome {
        violations.push("second analysis of the same input differs".to_string());
    }

    println!(
        "AUDIT summary: bars={} breaks={} order_blocks={} fvgs={} sweeps={} entries={} direction={:?}",
        candles.len(),
        breaks_seen,
        order_blocks,
        gaps,
        sweeps,
        entries,
        analysis.structure.direction
    );

    if violations.is_empty() {
        println!("AUDIT result: PASS");
        return Ok(());
    }

    println!("AUDIT result: FAIL violations={}", violations.len());
    for item in violations.iter().take(30) {
        println!("  - {}", item);
    }
    std::process::exit(1);
}
