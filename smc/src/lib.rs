pub mod annotated;
pub mod candle;
pub mod config;
pub mod constant;
pub mod engine;
pub mod features;
pub mod fvg;
pub mod indicator;
pub mod liquidity;
pub mod logging;
pub mod order_block;
pub mod series;
pub mod signal;
pub mod structure;
pub mod swing;
mod utils;

pub use annotated::{AnnotatedBar, AnnotatedSeries};
pub use candle::{Candle, PriceZone};
pub use config::{SmcConfig, SmcConfigPatch, SmcProfileConfig};
pub use constant::{
	DataError, Direction, EntryTag, SmcError, StructureSignal, Sweep, Timeframe, ZoneSide,
};
pub use engine::{AnalysisOutcome, SmcAnalysis, SmcEngine};
pub use features::{
	BreakKind, BreakOfStructure, FairValueGapFeature, GapKind, LiquidityKind, LiquidityZone,
	OrderBlockFeature, OrderBlockKind, SignalEvent, SmcFeatures, TradingSignals,
};
pub use fvg::{detect_fair_value_gaps, FVG_PATTERN_WIDTH};
pub use indicator::{Ema, Indicator, IndicatorSnapshot, Rsi, Sma};
pub use liquidity::detect_sweeps;
pub use logging::init_logging;
pub use order_block::locate_order_blocks;
pub use series::{parse_timestamp, read_csv_candles, CandleSeries};
pub use signal::{synthesize, BarContext, SignalFlags};
pub use structure::{
	fibonacci_levels, track_structure, FibonacciLevel, StructureBreak, StructureRules,
	StructureRun, StructureState, FIBONACCI_RATIOS,
};
pub use swing::{detect_swings, SwingMarks};
