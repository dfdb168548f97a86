//! Forwarding client used by the entry service.

use axum::body::Bytes;
use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::client::error::{ClientError, ForwardError};
use crate::domain::{Cep, CepRequest, ErrorKind};
use crate::observability::Propagator;

/// Client for the weather service's `POST /weather` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherServiceClient {
    http: Client,
    url: Url,
    propagator: Propagator,
}

impl WeatherServiceClient {
    pub fn new(url: &str, http: Client, propagator: Propagator) -> Result<Self, ClientError> {
        let url = Url::parse(url).map_err(|source| ClientError::InvalidUrl {
            field: "downstream.url",
            value: url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            url,
            propagator,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Forward `cep` and return the weather service's body untouched on 200.
    #[instrument(name = "call_service_b", skip_all, fields(otel.kind = "client", cep = %cep))]
    pub async fn forward(&self, cep: &Cep) -> Result<Bytes, ForwardError> {
        let request = CepRequest {
            cep: cep.to_string(),
        };

        let response = self
            .http
            .post(self.url.clone())
            .headers(self.propagator.outbound_headers())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        match ErrorKind::from_downstream_status(status) {
            None => Ok(body),
            Some(ErrorKind::Internal) => {
                tracing::warn!(
                    status = %status,
                    body = %String::from_utf8_lossy(&body),
                    "Unexpected status from weather service"
                );
                Err(ForwardError::Status(status))
            }
            Some(_) => {
                tracing::debug!(status = %status, "Weather service rejected request");
                Err(ForwardError::Status(status))
            }
        }
    }
}
