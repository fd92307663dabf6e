//! HTTP error responses for the web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::error::TplanError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &TplanError) -> StatusCode {
    match err {
        TplanError::InvalidPriceData { .. }
        | TplanError::EmptyCsv
        | TplanError::Csv { .. }
        | TplanError::ConfigMissing { .. }
        | TplanError::ConfigInvalid { .. }
        | TplanError::ConfigParse { .. }
        | TplanError::Watchlist(_) => StatusCode::BAD_REQUEST,
        TplanError::NoData { .. } => StatusCode::NOT_FOUND,
        TplanError::Database { .. } | TplanError::DatabaseQuery { .. } | TplanError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<TplanError> for WebError {
    fn from(err: TplanError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        } else {
            tracing::debug!(status = %self.status, message = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "ok": false, "error": self.message }))).into_response()
    }
}
