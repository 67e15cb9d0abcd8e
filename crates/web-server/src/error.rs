use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid window size {0}: the window must be at least 1")]
    InvalidWindow(i64),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidWindow(window) | AppError::Analytics(AnalyticsError::InvalidWindow(window)) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid window size {window}: the window must be at least 1"),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Analytics(analytics_err) => {
                // The full chain stays in the operator logs; clients get a fixed message.
                tracing::error!(error = ?analytics_err, "Analytics error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred while reading transaction data".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
