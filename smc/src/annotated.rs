use std::fs::{create_dir_all, File};
use std::path::Path;

use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};
use serde::Serialize;

use crate::candle::{Candle, PriceZone};
use crate::constant::{DataError, EntryTag, StructureSignal, Sweep};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedBar {
    pub candle: Candle,
    pub is_swing_high: bool,
    pub is_swing_low: bool,
    pub structure_signal: StructureSignal,
    pub order_block: Option<PriceZone>,
    pub fvg: Option<PriceZone>,
    pub liquidity_sweep: Sweep,
    pub enter_long: bool,
    pub enter_short: bool,
    pub exit_long: bool,
    pub exit_short: bool,
    pub entry_tag: Option<EntryTag>,
}

impl AnnotatedBar {
    pub fn neutral(candle: Candle) -> Self {
        Self {
            candle,
            is_swing_high: false,
            is_swing_low: false,
            structure_signal: StructureSignal::None,
            order_block: None,
            fvg: None,
            liquidity_sweep: Sweep::None,
            enter_long: false,
            enter_short: false,
            exit_long: false,
            exit_short: false,
            entry_tag: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotatedSeries {
    bars: Vec<AnnotatedBar>,
}

impl AnnotatedSeries {
    pub(crate) fn from_bars(bars: Vec<AnnotatedBar>) -> Self {
        Self { bars }
    }

    pub fn neutral(candles: &[Candle]) -> Self {
        Self {
            bars: candles.iter().cloned().map(AnnotatedBar::neutral).collect(),
        }
    }

    pub fn bars(&self) -> &[AnnotatedBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AnnotatedBar> {
        self.bars.get(index)
    }

    /// Column view, one row per bar. Zone codes are `1` bullish, `-1` bearish, `0` none.
    pub fn dataframe(&self) -> Result<DataFrame, DataError> {
        let bars = &self.bars;
        let zone_code = |zone: &Option<PriceZone>| zone.map_or(0, |z| z.side.code());

        let timestamp: Vec<i64> = bars.iter().map(|x| x.candle.timestamp.timestamp_millis()).collect();
        let open: Vec<f64> = bars.iter().map(|x| x.candle.open).collect();
        let high: Vec<f64> = bars.iter().map(|x| x.candle.high).collect();
        let low: Vec<f64> = bars.iter().map(|x| x.candle.low).collect();
        let close: Vec<f64> = bars.iter().map(|x| x.candle.close).collect();
        let volume: Vec<f64> = bars.iter().map(|x| x.candle.volume).collect();
        let swing_high: Vec<bool> = bars.iter().map(|x| x.is_swing_high).collect();
        let swing_low: Vec<bool> = bars.iter().map(|x| x.is_swing_low).collect();
        let structure: Vec<i32> = bars.iter().map(|x| x.structure_signal.code()).collect();
        let ob: Vec<i32> = bars.iter().map(|x| zone_code(&x.order_block)).collect();
        let top_ob: Vec<Option<f64>> = bars.iter().map(|x| x.order_block.map(|z| z.top)).collect();
        let bottom_ob: Vec<Option<f64>> = bars.iter().map(|x| x.order_block.map(|z| z.bottom)).collect();
        let fvg: Vec<i32> = bars.iter().map(|x| zone_code(&x.fvg)).collect();
        let top_fvg: Vec<Option<f64>> = bars.iter().map(|x| x.fvg.map(|z| z.top)).collect();
        let bottom_fvg: Vec<Option<f64>> = bars.iter().map(|x| x.fvg.map(|z| z.bottom)).collect();
        let swept: Vec<i32> = bars.iter().map(|x| x.liquidity_sweep.code()).collect();
        let enter_long: Vec<bool> = bars.iter().map(|x| x.enter_long).collect();
        let enter_short: Vec<bool> = bars.iter().map(|x| x.enter_short).collect();
        let exit_long: Vec<bool> = bars.iter().map(|x| x.exit_long).collect();
        let exit_short: Vec<bool> = bars.iter().map(|x| x.exit_short).collect();
        let enter_tag: Vec<String> = bars
            .iter()
            .map(|x| x.entry_tag.map(|t| t.as_str().to_string()).unwrap_or_default())
            .collect();

        let frame = df!(
            "timestamp" => timestamp,
            "open" => open,
            "high" => high,
            "low" => low,
            "close" => close,
            "volume" => volume,
            "swing_high" => swing_high,
            "swing_low" => swing_low,
            "structure_signal" => structure,
            "ob" => ob,
            "top_ob" => top_ob,
            "bottom_ob" => bottom_ob,
            "fvg" => fvg,
            "top_fvg" => top_fvg,
            "bottom_fvg" => bottom_fvg,
            "swept" => swept,
            "enter_long" => enter_long,
            "enter_short" => enter_short,
            "exit_long" => exit_long,
            "exit_short" => exit_short,
            "enter_tag" => enter_tag
        )?;
        Ok(frame)
    }

    pub fn write_parquet(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let mut frame = self.dataframe()?;
        let mut file = File::create(path)?;
        ParquetWriter::new(&mut file).finish(&mut frame)?;
        Ok(())
    }
}
