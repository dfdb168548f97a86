//! Weather service (`POST /weather`).
//!
//! Validates the postal code, resolves it to a city, fetches the current
//! temperature and answers with a [`TemperatureReport`].

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{field, Instrument, Span};

use crate::client::LookupClient;
use crate::domain::{ErrorKind, ServiceError, TemperatureReport};
use crate::http::request::decode_cep;
use crate::http::response::error_response;
use crate::observability::{metrics, Propagator};

pub const ROUTE: &str = "/weather";

/// Handler state for the weather role.
#[derive(Debug, Clone)]
pub struct WeatherState {
    pub lookup: LookupClient,
    pub propagator: Propagator,
}

pub async fn handle_weather_request(
    State(state): State<WeatherState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let span = tracing::info_span!(
        "handle_weather_request",
        otel.kind = "server",
        cep = field::Empty,
        city = field::Empty,
    );
    state.propagator.set_parent(&span, &headers);

    let response = async {
        match build_report(&state, &body).await {
            Ok(report) => Json(report).into_response(),
            Err(err) => error_response(err),
        }
    }
    .instrument(span)
    .await;

    metrics::record_request(ROUTE, response.status().as_u16(), start);
    response
}

async fn build_report(state: &WeatherState, body: &[u8]) -> Result<TemperatureReport, ServiceError> {
    let cep = decode_cep(body)?;
    let span = Span::current();
    span.record("cep", cep.as_str());

    // NotFound stays distinct, every other lookup failure is internal.
    let city = state.lookup.resolve_location(&cep).await?;
    span.record("city", city.as_str());

    let sample = state
        .lookup
        .fetch_weather(&city)
        .await
        .map_err(|e| ServiceError::with_cause(ErrorKind::Internal, e))?;

    let report = TemperatureReport::new(city, sample);
    tracing::info!(
        temp_c = report.temp_c,
        temp_f = report.temp_f,
        temp_k = report.temp_k,
        "Temperature resolved"
    );
    Ok(report)
}
