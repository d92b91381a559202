use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::normalize_ticker;
use crate::{AppState, error::AppError};

/// Click counters are cumulative, as the page keeps them.
#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    #[serde(default)]
    pub buy_clicks: u64,
    #[serde(default)]
    pub close_clicks: u64,
    #[serde(default)]
    pub is_open: bool,
    pub ticker: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ModalState {
    pub is_open: bool,
    pub body: String,
}

#[derive(Debug, PartialEq, Eq)]
enum ModalAction {
    Keep,
    Open,
    Close,
}

fn next_action(buy_clicks: u64, close_clicks: u64, is_open: bool) -> ModalAction {
    if buy_clicks == 0 && close_clicks == 0 {
        ModalAction::Keep
    } else if is_open {
        ModalAction::Close
    } else {
        ModalAction::Open
    }
}

fn confirmation(ticker: &str, price: f64, markup: f64) -> String {
    format!("Do you want to buy {ticker} at ${:.2}?", price * markup)
}

/// POST /dash/buy - open or close the purchase confirmation dialog.
#[instrument(skip_all, fields(ticker = %req.ticker, is_open = req.is_open))]
pub async fn toggle_modal(
    State(state): State<AppState>,
    Json(req): Json<BuyRequest>,
) -> Result<Json<ModalState>, AppError> {
    let modal = match next_action(req.buy_clicks, req.close_clicks, req.is_open) {
        ModalAction::Keep => ModalState {
            is_open: req.is_open,
            body: String::new(),
        },
        ModalAction::Close => ModalState {
            is_open: false,
            body: String::new(),
        },
        ModalAction::Open => {
            let ticker = normalize_ticker(&req.ticker)?;
            let quote = state
                .price_client
                .fetch_live_price(&ticker)
                .await
                .map_err(AppError::Upstream)?;

            info!(price = quote.price, "live price fetched");
            ModalState {
                is_open: true,
                body: confirmation(&ticker, quote.price, state.config.purchase_markup),
            }
        }
    };

    Ok(Json(modal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_clicks_keeps_state() {
        assert_eq!(next_action(0, 0, false), ModalAction::Keep);
        assert_eq!(next_action(0, 0, true), ModalAction::Keep);
    }

    #[test]
    fn click_toggles() {
        assert_eq!(next_action(1, 0, false), ModalAction::Open);
        assert_eq!(next_action(1, 0, true), ModalAction::Close);
        assert_eq!(next_action(1, 1, true), ModalAction::Close);
        assert_eq!(next_action(2, 1, false), ModalAction::Open);
    }

    #[test]
    fn confirmation_applies_markup() {
        assert_eq!(
            confirmation("TSLA", 200.0, 1.1),
            "Do you want to buy TSLA at $220.00?"
        );
        assert_eq!(
            confirmation("F", 12.345, 1.0),
            "Do you want to buy F at $12.35?"
        );
    }
}
