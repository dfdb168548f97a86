//! Response construction.
//!
//! # Responsibilities
//! - Render every failure as `{"message": ...}` with the kind's status code
//! - Log the full cause chain, never send it to the client
//! - Attach an `error_response` event to the active span
//! - Pass successful downstream bodies through without re-serializing

use axum::{
    body::Bytes,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{ErrorKind, ServiceError};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
}

/// Turn a failure into the client-facing response.
///
/// Call inside the handler span so the event lands on it.
pub fn error_response(err: ServiceError) -> Response {
    let kind = err.kind();
    let status = kind.status_code();

    match kind {
        ErrorKind::Internal => tracing::error!(error = %err.detail(), "Request failed"),
        _ => tracing::info!(error = %err.detail(), "Request rejected"),
    }
    tracing::info!(http.status_code = status.as_u16(), "error_response");

    let envelope = ErrorEnvelope {
        message: kind.public_message().to_string(),
    };
    (status, Json(envelope)).into_response()
}

/// 200 response carrying an already-encoded JSON body.
pub fn json_passthrough(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        error_response(self)
    }
}
