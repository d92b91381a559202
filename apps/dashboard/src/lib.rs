use std::sync::Arc;

use stock::{ChartTheme, PriceClient, SymbolStore};

pub mod config;
pub mod error;
pub mod routes;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub symbol_store: Arc<SymbolStore>,
    pub price_client: Arc<PriceClient>,
    pub theme: ChartTheme,
}

impl AppState {
    pub fn new(config: Config, symbol_store: SymbolStore, price_client: PriceClient) -> Self {
        Self {
            config: Arc::new(config),
            symbol_store: Arc::new(symbol_store),
            price_client: Arc::new(price_client),
            theme: ChartTheme::default(),
        }
    }
}
