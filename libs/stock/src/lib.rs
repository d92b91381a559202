mod price_client;
mod summary;
mod symbol_store;

pub mod chart;
pub mod indicators;

pub use chart::{ChartKind, ChartTheme, Figure};
pub use price_client::{Bar, Interval, LiveQuote, PriceClient};
pub use summary::{InfoRow, summarize};
pub use symbol_store::{DEFAULT_SYMBOLS, SymbolStore};
