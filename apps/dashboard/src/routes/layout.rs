use axum::{Json, extract::State};
use serde::Serialize;
use stock::{
    ChartKind,
    chart::{ChartOption, RangePreset, chart_options, range_presets},
};

use crate::AppState;

/// Everything the dashboard page needs to draw its form.
#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: &'static str,
    pub tickers: Vec<String>,
    pub default_ticker: String,
    pub charts: Vec<ChartOption>,
    pub default_chart: &'static str,
    pub range_presets: Vec<RangePreset>,
    pub background: &'static str,
    pub text: &'static str,
}

pub async fn layout(State(state): State<AppState>) -> Json<Layout> {
    Json(Layout {
        title: "Stock Dashboard",
        tickers: state.symbol_store.list().to_vec(),
        default_ticker: state.symbol_store.random_pick().to_string(),
        charts: chart_options(),
        default_chart: ChartKind::Line.as_str(),
        range_presets: range_presets(),
        background: state.theme.background,
        text: state.theme.text,
    })
}
