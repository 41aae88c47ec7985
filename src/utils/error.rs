use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
///
/// Gate rejections (400-class) carry their reason verbatim to the client.
/// Store-side failures (500-class) keep the driver detail in the server log
/// only and return a generic message, so backend error text never reaches
/// the HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidSql(String),

    #[error("{0}")]
    SqlSafetyViolation(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Could not reach or authenticate against the sample store.
    #[error("{0}")]
    StoreUnavailable(String),

    /// The store accepted the connection but rejected the statement.
    #[error("{0}")]
    QueryFailed(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_sql(msg: impl Into<String>) -> Self {
        Self::InvalidSql(msg.into())
    }

    pub fn sql_safety_violation(msg: impl Into<String>) -> Self {
        Self::SqlSafetyViolation(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn query_failed(msg: impl Into<String>) -> Self {
        Self::QueryFailed(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for errors the client caused and can fix (gate rejections).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSql(_) | Self::SqlSafetyViolation(_) | Self::Validation(_)
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidSql(msg)
            | ApiError::SqlSafetyViolation(msg)
            | ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::StoreUnavailable(detail) => {
                tracing::error!("sample store unavailable: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Sample store is unavailable".to_string())
            },
            ApiError::QueryFailed(detail) => {
                tracing::error!("query execution failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Query execution failed".to_string())
            },
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            },
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_rejections_are_client_errors() {
        assert!(ApiError::invalid_sql("x").is_client_error());
        assert!(ApiError::sql_safety_violation("x").is_client_error());
        assert!(!ApiError::query_failed("x").is_client_error());
    }
}
