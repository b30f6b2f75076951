use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use scanner::{CsvDirectorySource, ScanConfig, ScanJob, Scanner};
use smc::{SmcConfig, Timeframe};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	smc::init_logging();

	let args: Vec<String> = std::env::args().collect();
	if args.len() < 4 {
		eprintln!(
			"usage: cargo run -q -p scan -- <csv_dir> <timeframe:1m|5m|15m|30m|1h|4h|1d|1w> <symbols,comma-separated> [config_yaml]"
		);
		std::process::exit(2);
	}

	let source = Arc::new(CsvDirectorySource::new(&args[1]));
	let timeframe = Timeframe::parse(&args[2])?;
	let jobs: Vec<ScanJob> = args[3]
		.split(',')
		.map(str::trim)
		.filter(|x| !x.is_empty())
		.map(|symbol| ScanJob::new(symbol, timeframe))
		.collect();
	let smc_config = match args.get(4) {
		Some(path) => SmcConfig::from_yaml_file(path)?,
		None => SmcConfig::default(),
	};

	let mut scan_config = ScanConfig::default();
	if let Some(workers) = std::env::var("SMC_SCAN_WORKERS")
		.ok()
		.and_then(|x| x.parse::<usize>().ok())
	{
		scan_config.workers = workers.max(1);
	}
	let interval = std::env::var("SMC_SCAN_INTERVAL_SECS")
		.ok()
		.and_then(|x| x.parse::<u64>().ok())
		.filter(|x| *x > 0)
		.map(Duration::from_secs);

	let scanner = Scanner::with_config(source, smc_config, scan_config)?;
	let mut previous = HashMap::new();
	let mut round = 0u64;

	loop {
		round += 1;
		let report = scanner.scan(&jobs, &previous);

		let mut states: Vec<_> = report.states.iter().collect();
		states.sort_by(|a, b| a.0.cmp(b.0));
		for ((symbol, tf), state) in states {
			println!("{symbol} {tf} {state}");
		}
		for flip in &report.flips {
			println!(
				"FLIP {} {} {} -> {} @ {}",
				flip.symbol, flip.timeframe, flip.from, flip.to, flip.price
			);
		}
		for (symbol, tf) in &report.insufficient {
			println!("{symbol} {tf} insufficient_data");
		}
		for failure in &report.failures {
			println!("{} {} failed: {failure}", failure.symbol(), failure.timeframe());
		}

		let metrics = scanner.metrics();
		info!(
			round,
			scanned = metrics.scanned,
			ready = metrics.ready,
			flips = metrics.flips,
			failed = metrics.failed,
			"scan round done"
		);

		let Some(interval) = interval else {
			break;
		};
		previous = report.states;
		std::thread::sleep(interval);
	}

	Ok(())
}
