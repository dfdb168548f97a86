//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Decode and validate the `{"cep": ...}` body
//!
//! # Design Decisions
//! - Request ID added as early as possible so access logs carry it
//! - The body is decoded by hand so a malformed body maps to 422 with the
//!   standard error envelope instead of the framework's rejection

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::domain::{Cep, CepRequest, ServiceError};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Decode a request body into a validated [`Cep`].
///
/// A decode failure and a failed validation both yield `UnprocessableInput`.
pub fn decode_cep(body: &[u8]) -> Result<Cep, ServiceError> {
    // Only the first JSON value counts; trailing bytes are ignored.
    let request = match serde_json::Deserializer::from_slice(body)
        .into_iter::<CepRequest>()
        .next()
    {
        Some(Ok(request)) => request,
        Some(Err(e)) => {
            tracing::debug!(error = %e, "Rejected undecodable body");
            return Err(ServiceError::invalid_input());
        }
        None => {
            tracing::debug!("Rejected empty body");
            return Err(ServiceError::invalid_input());
        }
    };

    Cep::try_from(request).map_err(|rejected| {
        tracing::debug!(cep = %rejected.cep, "Rejected invalid postal code");
        ServiceError::invalid_input()
    })
}
