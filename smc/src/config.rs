use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::{DataError, SmcError, Timeframe};

/// Engine knobs with the classic SMC defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmcConfig {
    /// Half-width of the centered swing window; wider finds fewer, more significant swings.
    pub swing_lookback: usize,
    /// Trailing bars (current excluded) used to re-seed the opposite extreme on a break.
    pub structure_window: usize,
    /// How far back a break searches for its originating opposite-colored candle.
    pub order_block_scan: usize,
    pub liquidity_window: usize,
    pub signal_window: usize,
    pub max_order_blocks: usize,
    pub max_liquidity_zones: usize,
    pub max_breaks: usize,
    pub max_fair_value_gaps: usize,
    /// Lets an established trend reverse on a close through the opposite extreme.
    /// Off by default: a trend only breaks out of `Undetermined` or in its own direction.
    pub allow_reversals: bool,
}

impl Default for SmcConfig {
    fn default() -> Self {
        Self {
            swing_lookback: 20,
            structure_window: 10,
            order_block_scan: 10,
            liquidity_window: 5,
            signal_window: 50,
            max_order_blocks: 10,
            max_liquidity_zones: 10,
            max_breaks: 10,
            max_fair_value_gaps: 20,
            allow_reversals: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmcConfigPatch {
    pub swing_lookback: Option<usize>,
    pub structure_window: Option<usize>,
    pub order_block_scan: Option<usize>,
    pub liquidity_window: Option<usize>,
    pub signal_window: Option<usize>,
    pub max_order_blocks: Option<usize>,
    pub max_liquidity_zones: Option<usize>,
    pub max_breaks: Option<usize>,
    pub max_fair_value_gaps: Option<usize>,
    pub allow_reversals: Option<bool>,
}

/// Layered per-symbol / per-timeframe overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmcProfileConfig {
    #[serde(default)]
    pub default: SmcConfigPatch,
    #[serde(default)]
    pub timeframe: HashMap<String, SmcConfigPatch>,
    #[serde(default)]
    pub symbol: HashMap<String, SmcConfigPatch>,
    #[serde(default)]
    pub symbol_timeframe: HashMap<String, SmcConfigPatch>,
}

impl SmcConfig {
    /// Shortest series the engine will analyze.
    pub fn min_bars(&self) -> usize {
        self.swing_lookback * 2 + 1
    }

    pub fn validate(&self) -> Result<(), SmcError> {
        let windows = [
            ("swing_lookback", self.swing_lookback),
            ("structure_window", self.structure_window),
            ("order_block_scan", self.order_block_scan),
            ("liquidity_window", self.liquidity_window),
            ("signal_window", self.signal_window),
            ("max_order_blocks", self.max_order_blocks),
            ("max_liquidity_zones", self.max_liquidity_zones),
            ("max_breaks", self.max_breaks),
            ("max_fair_value_gaps", self.max_fair_value_gaps),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(SmcError::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }

    pub fn apply_patch(mut self, patch: SmcConfigPatch) -> Self {
        if let Some(v) = patch.swing_lookback {
            self.swing_lookback = v;
        }
        if let Some(v) = patch.structure_window {
            self.structure_window = v;
        }
        if let Some(v) = patch.order_block_scan {
            self.order_block_scan = v;
        }
        if let Some(v) = patch.liquidity_window {
            self.liquidity_window = v;
        }
        if let Some(v) = patch.signal_window {
            self.signal_window = v;
        }
        if let Some(v) = patch.max_order_blocks {
            self.max_order_blocks = v;
        }
        if let Some(v) = patch.max_liquidity_zones {
            self.max_liquidity_zones = v;
        }
        if let Some(v) = patch.max_breaks {
            self.max_breaks = v;
        }
        if let Some(v) = patch.max_fair_value_gaps {
            self.max_fair_value_gaps = v;
        }
        if let Some(v) = patch.allow_reversals {
            self.allow_reversals = v;
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SmcError> {
        let patch: SmcConfigPatch = serde_yaml::from_str(yaml).map_err(DataError::from)?;
        let config = Self::default().apply_patch(patch);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SmcError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}

impl SmcProfileConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SmcError> {
        Ok(serde_yaml::from_str(yaml).map_err(DataError::from)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SmcError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Layers `default`, `timeframe`, `symbol`, then `symbol_timeframe`
    /// (`*.tf`, `SYM.*`, `SYM.tf`) over the built-in defaults.
    pub fn resolve_for(&self, symbol: &str, timeframe: Timeframe) -> SmcConfig {
        let symbol_norm = normalize_key(symbol);
        let tf_norm = timeframe.as_str().to_string();
        let symbol_tf = format!("{symbol_norm}.{tf_norm}");
        let symbol_wild = format!("{symbol_norm}.*");
        let tf_wild = format!("*.{tf_norm}");

        let mut config = SmcConfig::default().apply_patch(self.default.clone());

        let layers = [
            (&self.timeframe, tf_norm.as_str()),
            (&self.symbol, symbol_norm.as_str()),
            (&self.symbol_timeframe, tf_wild.as_str()),
            (&self.symbol_timeframe, symbol_wild.as_str()),
            (&self.symbol_timeframe, symbol_tf.as_str()),
        ];
        for (map, key) in layers {
            if let Some(patch) = find_patch(map, key) {
                config = config.apply_patch(patch.clone());
            }
        }

        config
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_ascii_uppercase().replace('/', "")
}

fn find_patch<'a>(
    map: &'a HashMap<String, SmcConfigPatch>,
    key: &str,
) -> Option<&'a SmcConfigPatch> {
    map.iter()
        .find(|(k, _)| normalize_map_key(k) == normalize_map_key(key))
        .map(|(_, v)| v)
}

fn normalize_map_key(value: &str) -> String {
    match value.split_once('.') {
        Some((symbol, tf)) => format!("{}.{}", normalize_key(symbol), tf.trim().to_ascii_lowercase()),
        None => value.trim().to_ascii_lowercase().replace('/', ""),
    }
}

#[cfg(test)]
mod tests {
    use super::{SmcConfig, SmcProfileConfig};
    use crate::constant::Timeframe;

    #[test]
    fn patch_overrides_only_named_fields() {
        let config = SmcConfig::from_yaml_str("swing_lookback: 5\nallow_reversals: true\n").unwrap();
        assert_eq!(config.swing_lookback, 5);
        assert!(config.allow_reversals);
        assert_eq!(config.order_block_scan, 10);
        assert_eq!(config.min_bars(), 11);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(SmcConfig::from_yaml_str("liquidity_window: 0\n").is_err());
    }

    #[test]
    fn profile_layers_most_specific_last() {
        let yaml = r#"
default:
  swing_lookback: 15
timeframe:
  4h:
    swing_lookback: 12
symbol:
  BTC/USDT:
    max_fair_value_gaps: 5
symbol_timeframe:
  "*.4h":
    signal_window: 30
  "BTCUSDT.4h":
    swing_lookback: 8
"#;
        let profile = SmcProfileConfig::from_yaml_str(yaml).unwrap();

        let btc = profile.resolve_for("BTC/USDT", Timeframe::H4);
        assert_eq!(btc.swing_lookback, 8);
        assert_eq!(btc.max_fair_value_gaps, 5);
        assert_eq!(btc.signal_window, 30);

        let eth = profile.resolve_for("ETH/USDT", Timeframe::H4);
        assert_eq!(eth.swing_lookback, 12);
        assert_eq!(eth.max_fair_value_gaps, 20);

        let eth_daily = profile.resolve_for("ETH/USDT", Timeframe::D1);
        assert_eq!(eth_daily.swing_lookback, 15);
        assert_eq!(eth_daily.signal_window, 50);
    }
}
