//! Indicator columns computed from the close price.
//!
//! Every function returns exactly one value per input row.

mod momentum;
mod moving_average;

pub use momentum::{MacdSeries, macd, rsi};
pub use moving_average::{ema, sma};
