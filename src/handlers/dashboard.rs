use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

use crate::AppState;
use crate::embedded::WebAssets;
use crate::utils::{ApiError, ApiResult};

/// Dashboard page with the default query and refresh interval injected into
/// the embedded template.
pub async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    let file = WebAssets::get("index.html")
        .ok_or_else(|| ApiError::internal_error("dashboard template missing from binary"))?;

    let template = String::from_utf8_lossy(&file.data);
    let page = template
        .replace("__DEFAULT_QUERY__", &escape_html(&state.dashboard.default_query))
        .replace("__REFRESH_MS__", &state.dashboard.refresh_ms.to_string());

    Ok(Html(page))
}

/// Serve the remaining embedded assets (scripts, styles). API routes never
/// reach this fallback.
pub async fn serve_static_files(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if path.starts_with("api/") || path.starts_with("api-docs/") {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    if let Some(file) = WebAssets::get(path) {
        let content_type = get_content_type(path);
        let data: Vec<u8> = file.data.to_vec();
        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(data))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
            .into_response();
    }

    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn get_content_type(path: &str) -> HeaderValue {
    let ext = path.rsplit('.').next().unwrap_or("");
    let content_type = match ext {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    };
    HeaderValue::from_static(content_type)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
