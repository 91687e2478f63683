//! HTTP error responses

use agency_core::AgencyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Failure rendered as `{"error": message}` with a status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Renders any failure as 404; single-record lookups do not tell a
    /// missing record apart from a failed query.
    pub fn not_found(err: AgencyError) -> Self {
        Self::new(StatusCode::NOT_FOUND, err.to_string())
    }
}

impl From<AgencyError> for ApiError {
    fn from(err: AgencyError) -> Self {
        let status = match &err {
            AgencyError::Validation { .. } => StatusCode::BAD_REQUEST,
            AgencyError::AgentNotFound { .. } => StatusCode::NOT_FOUND,
            AgencyError::Storage { .. } | AgencyError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
