use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use crate::services::renderer::DEFAULT_LINE_POINTS;
use crate::utils::ApiResult;

#[derive(Debug, Deserialize)]
pub struct LineChartParams {
    pub points: Option<u64>,
}

// Time-series line chart of recent samples
#[utoipa::path(
    get,
    path = "/chart/line",
    params(
        ("points" = Option<u64>, Query, description = "Number of recent samples to plot (default 120)")
    ),
    responses(
        (status = 200, description = "PNG chart image", content_type = "image/png"),
        (status = 500, description = "Sample store failure")
    ),
    tag = "Charts"
)]
pub async fn line_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LineChartParams>,
) -> ApiResult<impl IntoResponse> {
    let points = params.points.unwrap_or(DEFAULT_LINE_POINTS);
    let png = state.renderer.render_line(points).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

// Pie of the most recent sample
#[utoipa::path(
    get,
    path = "/chart/pie",
    responses(
        (status = 200, description = "PNG chart image", content_type = "image/png"),
        (status = 500, description = "Sample store failure")
    ),
    tag = "Charts"
)]
pub async fn pie_chart(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let png = state.renderer.render_pie().await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
