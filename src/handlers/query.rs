use axum::{Json, extract::State};
use std::sync::Arc;

use crate::AppState;
use crate::models::{QueryRequest, QueryResponse};
use crate::services::{query_gate, summarizer};
use crate::utils::{ApiError, ApiResult};

// Submit a new console query
#[utoipa::path(
    post,
    path = "/api/query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Query executed successfully", body = QueryResponse),
        (status = 400, description = "Query rejected by the gate"),
        (status = 500, description = "Sample store failure")
    ),
    tag = "Query Console"
)]
pub async fn run_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    let raw = request.sql.trim();
    if raw.is_empty() {
        return Err(ApiError::validation_error("Missing 'sql' in JSON body"));
    }

    // Rejection leaves the session untouched; only accepted text is
    // remembered for the refresh loop.
    let sanitized = query_gate::sanitize(raw, state.dashboard.max_points)?;
    state.session.submit(sanitized.clone()).await;

    execute_and_shape(&state, sanitized).await.map(Json)
}

// Re-run the last accepted query (auto-refresh polling)
#[utoipa::path(
    get,
    path = "/api/query",
    responses(
        (status = 200, description = "Last accepted query re-executed", body = QueryResponse),
        (status = 500, description = "Sample store failure")
    ),
    tag = "Query Console"
)]
pub async fn rerun_last(State(state): State<Arc<AppState>>) -> ApiResult<Json<QueryResponse>> {
    // The slot only ever holds sanitized text, so no second gate pass.
    let sql = state.session.last().await;
    execute_and_shape(&state, sql).await.map(Json)
}

async fn execute_and_shape(state: &AppState, sql: String) -> ApiResult<QueryResponse> {
    let result = state.executor.query(&sql).await?;
    let summary = summarizer::summarize(&result);

    Ok(QueryResponse { columns: result.columns, rows: result.rows, summary, sql })
}
