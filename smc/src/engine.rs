use serde::Serialize;
use tracing::{debug, info};

use crate::annotated::{AnnotatedBar, AnnotatedSeries};
use crate::candle::Candle;
use crate::config::SmcConfig;
use crate::constant::SmcError;
use crate::features::{extract, SmcFeatures};
use crate::fvg::detect_fair_value_gaps;
use crate::liquidity::detect_sweeps;
use crate::order_block::locate_order_blocks;
use crate::series::CandleSeries;
use crate::signal::{synthesize, BarContext};
use crate::structure::{
    fibonacci_levels, track_structure, FibonacciLevel, StructureBreak, StructureRules,
    StructureState,
};
use crate::swing::detect_swings;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmcAnalysis {
    pub annotated: AnnotatedSeries,
    pub features: SmcFeatures,
    pub structure: StructureState,
    pub breaks: Vec<StructureBreak>,
    pub fibonacci: Vec<FibonacciLevel>,
}

/// Result of a pass over validated input. Too little history is a normal
/// outcome, distinct from a malformed series.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Ready(Box<SmcAnalysis>),
    InsufficientData { required: usize, actual: usize },
}

impl AnalysisOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn analysis(&self) -> Option<&SmcAnalysis> {
        match self {
            Self::Ready(analysis) => Some(&**analysis),
            Self::InsufficientData { .. } => None,
        }
    }

    pub fn features(&self) -> SmcFeatures {
        self.analysis()
            .map(|a| a.features.clone())
            .unwrap_or_default()
    }
}

/// Runs the detectors in dependency order over one candle series:
/// swings, structure, then order blocks, gaps and sweeps, then signals.
///
/// The engine holds only configuration; every pass owns its state.
#[derive(Debug, Clone)]
pub struct SmcEngine {
    config: SmcConfig,
}

impl SmcEngine {
    pub fn new(config: SmcConfig) -> Result<Self, SmcError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SmcConfig {
        &self.config
    }

    /// Annotates every bar. Series shorter than the swing window come back
    /// with neutral annotations.
    pub fn annotate(&self, series: &CandleSeries) -> AnnotatedSeries {
        match self.run(series.candles()) {
            Some((annotated, _)) => annotated,
            None => AnnotatedSeries::neutral(series.candles()),
        }
    }

    pub fn analyze(&self, series: &CandleSeries) -> AnalysisOutcome {
        let required = self.config.min_bars();
        let actual = series.len();

        let Some((annotated, run)) = self.run(series.candles()) else {
            debug!(required, actual, "not enough bars for analysis");
            return AnalysisOutcome::InsufficientData { required, actual };
        };

        let features = extract(&annotated, &self.config);
        let structure = run.state;
        info!(
            bars = actual,
            order_blocks = features.order_blocks.len(),
            fair_value_gaps = features.fair_value_gaps.len(),
            breaks = run.breaks.len(),
            direction = ?structure.direction,
            "smc analysis complete"
        );

        AnalysisOutcome::Ready(Box::new(SmcAnalysis {
            annotated,
            features,
            fibonacci: fibonacci_levels(&structure),
            structure,
            breaks: run.breaks,
        }))
    }

    pub fn analyze_candles(&self, candles: Vec<Candle>) -> Result<AnalysisOutcome, SmcError> {
        let series = CandleSeries::new(candles)?;
        Ok(self.analyze(&series))
    }

    fn run(&self, candles: &[Candle]) -> Option<(AnnotatedSeries, FinishedRun)> {
        let config = &self.config;
        if candles.len() < config.min_bars() {
            return None;
        }

        let swings = detect_swings(candles, config.swing_lookback);
        let rules = StructureRules {
            window: config.structure_window,
            allow_reversals: config.allow_reversals,
        };
        let structure = track_structure(candles, rules);
        let state = structure.state?;
        let order_blocks = locate_order_blocks(candles, &structure.signals, config.order_block_scan);
        let gaps = detect_fair_value_gaps(candles);
        let sweeps = detect_sweeps(candles, config.liquidity_window);
        debug!(
            bars = candles.len(),
            breaks = structure.breaks.len(),
            "detector passes done"
        );

        let bars = candles
            .iter()
            .enumerate()
            .map(|(i, candle)| {
                let flags = synthesize(&BarContext {
                    candle,
                    structure: structure.signals[i],
                    sweep: sweeps[i],
                    order_block: order_blocks[i],
                    fvg: gaps[i],
                });
                AnnotatedBar {
                    candle: candle.clone(),
                    is_swing_high: swings.highs[i],
                    is_swing_low: swings.lows[i],
                    structure_signal: structure.signals[i],
                    order_block: order_blocks[i],
                    fvg: gaps[i],
                    liquidity_sweep: sweeps[i],
                    enter_long: flags.enter_long,
                    enter_short: flags.enter_short,
                    exit_long: flags.exit_long,
                    exit_short: flags.exit_short,
                    entry_tag: flags.entry_tag,
                }
            })
            .collect();

        Some((
            AnnotatedSeries::from_bars(bars),
            FinishedRun {
                state,
                breaks: structure.breaks,
            },
        ))
    }
}

struct FinishedRun {
    state: StructureState,
    breaks: Vec<StructureBreak>,
}
