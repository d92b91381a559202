use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use stock::{
    ChartKind, Figure, InfoRow,
    chart::{self, RangePreset, range_presets},
    summarize,
};
use tracing::{debug, instrument};

use super::{load_history, normalize_ticker};
use crate::{AppState, error::AppError};

#[derive(Debug, Deserialize)]
pub struct GraphRequest {
    /// Plot button click count; zero means the page has just loaded.
    #[serde(default)]
    pub n_clicks: u64,
    pub ticker: String,
    #[serde(default = "default_chart")]
    pub chart: String,
}

fn default_chart() -> String {
    ChartKind::Line.as_str().to_string()
}

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub graph: Value,
    pub live_price: Value,
    pub info: Vec<InfoRow>,
    pub range_presets: Vec<RangePreset>,
}

impl GraphResponse {
    fn empty() -> Self {
        Self {
            graph: json!({}),
            live_price: json!({}),
            info: Vec::new(),
            range_presets: range_presets(),
        }
    }
}

fn figure_value(figure: Option<Figure>) -> Result<Value, AppError> {
    match figure {
        Some(f) => serde_json::to_value(&f).map_err(|e| AppError::Internal(e.into())),
        None => Ok(json!({})),
    }
}

/// POST /dash/graph - main chart plus live-price readout for one ticker.
#[instrument(skip_all, fields(ticker = %req.ticker, chart = %req.chart, n_clicks = req.n_clicks))]
pub async fn graph_generator(
    State(state): State<AppState>,
    Json(req): Json<GraphRequest>,
) -> Result<Json<GraphResponse>, AppError> {
    if req.n_clicks == 0 {
        debug!("plot not clicked yet");
        return Ok(Json(GraphResponse::empty()));
    }

    let ticker = normalize_ticker(&req.ticker)?;
    let kind: ChartKind = req
        .chart
        .parse()
        .map_err(|e: anyhow::Error| AppError::BadRequest(e.to_string()))?;

    let bars = load_history(&state, &ticker).await?;
    if bars.is_empty() {
        return Ok(Json(GraphResponse::empty()));
    }

    let graph = chart::build_figure(kind, &bars, &state.config.ma_windows, &state.theme)?;
    let live_price = chart::build_live_price(&ticker, &bars, &state.theme);

    Ok(Json(GraphResponse {
        graph: figure_value(graph)?,
        live_price: figure_value(live_price)?,
        info: summarize(&bars),
        range_presets: range_presets(),
    }))
}
