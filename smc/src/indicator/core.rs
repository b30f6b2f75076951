use crate::candle::Candle;

pub trait Indicator: Send {
    fn name(&self) -> &str;
    fn reset(&mut self);
    fn update(&mut self, candle: &Candle) -> Option<f64>;

    /// Feeds `candles` from a clean state and returns the value after the last one.
    fn last_value(&mut self, candles: &[Candle]) -> Option<f64> {
        self.reset();
        candles.iter().fold(None, |_, candle| self.update(candle))
    }
}
