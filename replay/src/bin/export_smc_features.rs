use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use smc::{
    init_logging, AnalysisOutcome, CandleSeries, FibonacciLevel, SmcConfig, SmcFeatures,
    SmcProfileConfig, StructureBreak, StructureState, Timeframe,
};
use strategy::{MarketSummary, Strategy};
use tracing::info;

#[derive(Debug, Serialize)]
struct Payload {
    symbol: String,
    timeframe: Timeframe,
    bars: usize,
    first_bar: Option<DateTime<Utc>>,
    last_bar: Option<DateTime<Utc>>,
    status: &'static str,
    required_bars: usize,
    features: SmcFeatures,
    structure: Option<StructureState>,
    breaks: Vec<StructureBreak>,
    fibonacci: Vec<FibonacciLevel>,
    summary: Option<MarketSummary>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "usage: cargo run -q -p replay --bin export_smc_features -- <csv_path> <symbol> <timeframe:1m|5m|15m|30m|1h|4h|1d|1w> [output_json] [profile_yaml]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let symbol = args[2].clone();
    let timeframe = Timeframe::parse(&args[3])?;
    let output = args.get(4).map(PathBuf::from);
    let config = match args.get(5) {
        Some(path) => SmcProfileConfig::from_yaml_file(path)?.resolve_for(&symbol, timeframe),
        None => SmcConfig::default(),
    };

    let series = CandleSeries::from_csv(&csv_path)?;
    let strategy = Strategy::new(config)?;
    let engine = strategy.engine();
    let outcome = engine.analyze(&series);

    let mut payload = Payload {
        symbol: symbol.clone(),
        timeframe,
        bars: series.len(),
        first_bar: series.first().map(|c| c.timestamp),
        last_bar: series.last().map(|c| c.timestamp),
        status: "insufficient_data",
        required_bars: engine.config().min_bars(),
        features: SmcFeatures::default(),
        structure: None,
        breaks: Vec::new(),
        fibonacci: Vec::new(),
        summary: strategy
            .evaluate(&symbol, timeframe, &series)
            .summary()
            .cloned(),
    };
    if let AnalysisOutcome::Ready(analysis) = outcome {
        payload.status = "ready";
        payload.features = analysis.features;
        payload.structure = Some(analysis.structure);
        payload.breaks = analysis.breaks;
        payload.fibonacci = analysis.fibonacci;
    }

    if let Some(summary) = &payload.summary {
        eprintln!(
            "{} {} {} strength={:.2}",
            summary.symbol,
            summary.timeframe,
            summary.recommendation.label(),
            summary.signal_strength
        );
        for suggestion in &summary.suggestions {
            eprintln!("  - {}", suggestion.message());
        }
    }

    let json = serde_json::to_string_pretty(&payload)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, json)?;
            info!(
                path = %path.display(),
                status = payload.status,
                order_blocks = payload.features.order_blocks.len(),
                fair_value_gaps = payload.features.fair_value_gaps.len(),
                "exported smc features"
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
