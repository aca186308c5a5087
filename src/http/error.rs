//! Mapping of intent failures onto HTTP responses.
//!
//! Every error body is `{"error": "<message>"}`. Validation problems and
//! unreadable bodies are client errors; anything the ledger rejected is a
//! 500 carrying the ledger's message.

use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::sponsor::SponsorError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The body could not be read as JSON of the expected shape.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Sponsor(#[from] SponsorError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::Sponsor(SponsorError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Sponsor(SponsorError::Ledger(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Ledger call failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Rewrite the plain-text or empty bodies that tower-http layers produce
/// for oversize and timed-out requests into the `{"error"}` shape.
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let message = match status {
        StatusCode::PAYLOAD_TOO_LARGE => "request body too large",
        StatusCode::REQUEST_TIMEOUT => "request timed out",
        _ => return response,
    };

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }

    ApiError::Rejected {
        status,
        message: message.to_string(),
    }
    .into_response()
}
