mod buy;
mod graph;
mod health;
mod layout;
mod pages;
mod snapshot;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::Duration;
use stock::{Bar, Interval};
use tracing::{debug, info, warn};

use crate::{AppState, error::AppError};

pub use buy::{BuyRequest, ModalState};
pub use graph::{GraphRequest, GraphResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/about/", get(pages::about))
        .route("/dash/", get(pages::dashboard))
        .route("/dash/layout", get(layout::layout))
        .route("/dash/graph", post(graph::graph_generator))
        .route("/dash/buy", post(buy::toggle_modal))
        .route("/dash/chart.png", get(snapshot::snapshot))
        .route("/healthz", get(health::health))
        .with_state(state)
}

pub(crate) fn normalize_ticker(raw: &str) -> Result<String, AppError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::BadRequest("ticker is required".to_string()));
    }
    Ok(ticker)
}

/// Daily bars for the configured history window.
pub(crate) async fn load_history(state: &AppState, ticker: &str) -> Result<Vec<Bar>, AppError> {
    if !state.symbol_store.contains(ticker) {
        debug!(ticker, "ticker not in startup list");
    }

    info!(ticker, "fetching data");
    let bars = state
        .price_client
        .fetch_price(
            ticker,
            Duration::days(state.config.history_days),
            Interval::Day1,
        )
        .await
        .map_err(AppError::Upstream)?;

    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => info!(
            ticker,
            rows = bars.len(),
            from = %first.date,
            to = %last.date,
            last_close = last.close,
            "data loaded"
        ),
        _ => warn!(ticker, "no data returned"),
    }

    Ok(bars)
}
