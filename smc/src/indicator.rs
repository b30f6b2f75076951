pub mod core;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod snapshot;

pub use core::Indicator;
pub use ema::Ema;
pub use rsi::Rsi;
pub use sma::Sma;
pub use snapshot::IndicatorSnapshot;
