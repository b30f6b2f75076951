mod decision;

use serde::Serialize;
use smc::{
	AnalysisOutcome, Candle, CandleSeries, IndicatorSnapshot, SmcConfig, SmcEngine, SmcError,
	SmcFeatures, Timeframe,
};
use tracing::debug;

pub use decision::{
	DecisionEngine, KeyLevel, KeyLevelKind, MarketState, Recommendation, Suggestion, Trend,
};

/// Digest of one (symbol, timeframe) analysis for notification layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
	pub symbol: String,
	pub timeframe: Timeframe,
	pub price: f64,
	pub rsi: f64,
	pub indicators: IndicatorSnapshot,
	pub trend: Trend,
	pub signal_strength: f64,
	/// `signal_strength` scaled to 0..=100.
	pub confidence: f64,
	pub key_levels: Vec<KeyLevel>,
	pub recommendation: Recommendation,
	pub suggestions: Vec<Suggestion>,
	pub state: MarketState,
	pub features: SmcFeatures,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyReport {
	Ready(Box<MarketSummary>),
	/// Too little history; nothing was concluded about the market.
	Unavailable { required: usize, actual: usize },
}

impl StrategyReport {
	pub fn summary(&self) -> Option<&MarketSummary> {
		match self {
			Self::Ready(summary) => Some(&**summary),
			Self::Unavailable { .. } => None,
		}
	}

	pub fn state(&self) -> MarketState {
		self.summary().map_or(MarketState::Neutral, |s| s.state)
	}
}

pub struct Strategy {
	engine: SmcEngine,
	decision_engine: DecisionEngine,
}

impl Strategy {
	pub fn new(config: SmcConfig) -> Result<Self, SmcError> {
		Ok(Self {
			engine: SmcEngine::new(config)?,
			decision_engine: DecisionEngine,
		})
	}

	pub fn engine(&self) -> &SmcEngine {
		&self.engine
	}

	pub fn evaluate(
		&self,
		symbol: &str,
		timeframe: Timeframe,
		series: &CandleSeries,
	) -> StrategyReport {
		let features = match self.engine.analyze(series) {
			AnalysisOutcome::Ready(analysis) => analysis.features,
			AnalysisOutcome::InsufficientData { required, actual } => {
				debug!(symbol, %timeframe, required, actual, "summary unavailable");
				return StrategyReport::Unavailable { required, actual };
			}
		};
		let Some(indicators) = IndicatorSnapshot::compute(series) else {
			return StrategyReport::Unavailable {
				required: self.engine.config().min_bars(),
				actual: 0,
			};
		};

		let decisions = &self.decision_engine;
		let rsi = indicators.rsi;
		let signal_strength = decisions.signal_strength(&features, rsi);

		StrategyReport::Ready(Box::new(MarketSummary {
			symbol: symbol.to_string(),
			timeframe,
			price: indicators.current_price,
			rsi,
			indicators,
			trend: decisions.trend(&features),
			signal_strength,
			confidence: (signal_strength * 1000.0).round() / 100.0,
			key_levels: decisions.key_levels(&features),
			recommendation: decisions.recommend(signal_strength, rsi),
			suggestions: decisions.suggestions(&features),
			state: decisions.market_state(&features),
			features,
		}))
	}

	pub fn evaluate_candles(
		&self,
		symbol: &str,
		timeframe: Timeframe,
		candles: Vec<Candle>,
	) -> Result<StrategyReport, SmcError> {
		let series = CandleSeries::new(candles)?;
		Ok(self.evaluate(symbol, timeframe, &series))
	}
}
