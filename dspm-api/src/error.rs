//! API error type and its HTTP mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use dspm_engine::EngineError;

/// Errors returned by route handlers.
///
/// Rendered as `{"error": "<message>"}` with the status from [`ApiError::status`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be read as a provider list.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// The scan pipeline failed.
    #[error(transparent)]
    Scan(#[from] EngineError),
}

impl ApiError {
    /// Unsupported providers are client errors; every other pipeline failure is a 500.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Scan(EngineError::UnsupportedProvider(_) | EngineError::UnsupportedProviders(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Scan(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "scan request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
