use axum::{
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use serde::Deserialize;
use stock::{ChartKind, chart};
use tracing::{info, instrument};

use super::{load_history, normalize_ticker};
use crate::{AppState, error::AppError};

const DEFAULT_WIDTH: u32 = 1200;
const MAX_WIDTH: u32 = 4000;

#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    pub ticker: String,
    #[serde(default = "default_chart")]
    pub chart: String,
    pub width: Option<u32>,
}

fn default_chart() -> String {
    ChartKind::Line.as_str().to_string()
}

/// GET /dash/chart.png - server-rendered PNG of the main figure.
#[instrument(skip_all, fields(ticker = %query.ticker, chart = %query.chart))]
pub async fn snapshot(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ticker = normalize_ticker(&query.ticker)?;
    let kind: ChartKind = query
        .chart
        .parse()
        .map_err(|e: anyhow::Error| AppError::BadRequest(e.to_string()))?;
    let width = query.width.unwrap_or(DEFAULT_WIDTH);
    if width == 0 || width > MAX_WIDTH {
        return Err(AppError::BadRequest(format!(
            "width must be between 1 and {MAX_WIDTH}"
        )));
    }

    let bars = load_history(&state, &ticker).await?;
    let figure = chart::build_figure(kind, &bars, &state.config.ma_windows, &state.theme)?
        .ok_or_else(|| AppError::NotFound(format!("no data returned for {ticker}")))?;

    let png = tokio::task::spawn_blocking(move || chart::render_png(&figure, width))
        .await
        .map_err(anyhow::Error::from)??;

    info!(bytes = png.len(), "chart rendered");
    Ok(([(CONTENT_TYPE, "image/png")], png))
}
