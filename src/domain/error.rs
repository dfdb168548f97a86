//! Error taxonomy shared by both orchestrators.
//!
//! Lower layers keep their own error enums and expose an [`ErrorKind`];
//! handlers collapse them into a [`ServiceError`] at the HTTP boundary.

use axum::http::StatusCode;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Kind of failure, as seen by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed body or invalid postal code.
    UnprocessableInput,
    /// The postal code has no matching locality.
    NotFound,
    /// Transport failure, malformed provider response, anything unexpected.
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::UnprocessableInput => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the error envelope.
    pub fn public_message(self) -> &'static str {
        match self {
            ErrorKind::UnprocessableInput => "invalid zipcode",
            ErrorKind::NotFound => "can not find zipcode",
            ErrorKind::Internal => "internal server error",
        }
    }

    /// Map a downstream service status back to a local kind.
    ///
    /// Returns `None` for 200. Every status other than 404 and 422 collapses
    /// into `Internal`, including other 4xx codes.
    pub fn from_downstream_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::OK => None,
            StatusCode::NOT_FOUND => Some(ErrorKind::NotFound),
            StatusCode::UNPROCESSABLE_ENTITY => Some(ErrorKind::UnprocessableInput),
            _ => Some(ErrorKind::Internal),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::UnprocessableInput => "unprocessable input",
            ErrorKind::NotFound => "not found",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Error returned by an orchestrator step.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ServiceError {
    kind: ErrorKind,
    #[source]
    cause: Option<BoxError>,
}

impl ServiceError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, cause: None }
    }

    pub fn with_cause(kind: ErrorKind, cause: impl Into<BoxError>) -> Self {
        Self {
            kind,
            cause: Some(cause.into()),
        }
    }

    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::UnprocessableInput)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Render the cause chain for logs.
    pub fn detail(&self) -> String {
        let mut detail = self.kind.to_string();
        let mut source = self
            .cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static));
        while let Some(err) = source {
            detail.push_str(": ");
            detail.push_str(&err.to_string());
            source = err.source();
        }
        detail
    }
}

impl PartialEq<ErrorKind> for ServiceError {
    fn eq(&self, other: &ErrorKind) -> bool {
        self.kind == *other
    }
}
