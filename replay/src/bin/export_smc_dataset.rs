use std::path::PathBuf;

use smc::{init_logging, CandleSeries, SmcConfig, SmcEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "usage: cargo run -q -p replay --bin export_smc_dataset -- <csv_path> <output_parquet> [config_yaml]"
        );
        std::process::exit(2);
    }

    let csv_path = PathBuf::from(&args[1]);
    let output = PathBuf::from(&args[2]);
    let config = match args.get(3) {
        Some(path) => SmcConfig::from_yaml_file(path)?,
        None => SmcConfig::default(),
    };

    let series = CandleSeries::from_csv(&csv_path)?;
    let engine = SmcEngine::new(config)?;
    let annotated = engine.annotate(&series);
    if series.len() < engine.config().min_bars() {
        eprintln!(
            "warning: {} bars is below the {} needed; annotations are neutral",
            series.len(),
            engine.config().min_bars()
        );
    }

    annotated.write_parquet(&output)?;
    println!("exported {} annotated bars to {}", annotated.len(), output.display());
    Ok(())
}
