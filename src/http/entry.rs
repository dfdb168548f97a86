//! Entry service (`POST /cep`).
//!
//! Validates the postal code and forwards it to the weather service, mapping
//! the downstream status back onto local error kinds.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Response,
};
use tracing::{field, Instrument, Span};

use crate::client::WeatherServiceClient;
use crate::domain::ServiceError;
use crate::http::request::decode_cep;
use crate::http::response::{error_response, json_passthrough};
use crate::observability::{metrics, Propagator};

pub const ROUTE: &str = "/cep";

/// Handler state for the entry role.
#[derive(Debug, Clone)]
pub struct EntryState {
    pub downstream: WeatherServiceClient,
    pub propagator: Propagator,
}

pub async fn handle_cep_request(
    State(state): State<EntryState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let span = tracing::info_span!(
        "handle_cep_request",
        otel.kind = "server",
        cep = field::Empty,
    );
    state.propagator.set_parent(&span, &headers);

    let response = async {
        match forward_cep(&state, &body).await {
            Ok(body) => json_passthrough(body),
            Err(err) => error_response(err),
        }
    }
    .instrument(span)
    .await;

    metrics::record_request(ROUTE, response.status().as_u16(), start);
    response
}

async fn forward_cep(state: &EntryState, body: &[u8]) -> Result<Bytes, ServiceError> {
    let cep = decode_cep(body)?;
    Span::current().record("cep", cep.as_str());

    let body = state.downstream.forward(&cep).await?;
    tracing::debug!(bytes = body.len(), "Weather service answered");
    Ok(body)
}
