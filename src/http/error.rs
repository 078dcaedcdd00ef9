use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Body detail returned for every unhandled server-side failure.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error";

/// API error with HTTP status code
///
/// Serialized as `{"detail": ...}`. Server errors never expose their message;
/// it is logged instead.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
            INTERNAL_ERROR_DETAIL.to_string()
        } else {
            self.message
        };

        (self.status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Convert anyhow::Error to ApiError
///
/// Only the upload path reports client errors, and it builds them itself;
/// everything reaching this conversion is a server failure.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal_error(format!("{:#}", err))
    }
}
