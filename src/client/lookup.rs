//! Postal-code and weather provider lookups.
//!
//! # Responsibilities
//! - Resolve a CEP to its locality through ViaCEP
//! - Fetch the current temperature for a locality from WeatherAPI
//! - Translate provider responses into domain results or [`LookupError`]

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::client::error::{ClientError, LookupError, Provider};
use crate::client::truncate_body;
use crate::config::ProvidersConfig;
use crate::domain::{Cep, WeatherSample};
use crate::observability::Propagator;

/// Client for the two external providers used by the weather service.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: Client,
    viacep_base: Url,
    weather_base: Url,
    api_key: String,
    propagator: Propagator,
}

impl LookupClient {
    pub fn new(
        config: &ProvidersConfig,
        http: Client,
        propagator: Propagator,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            viacep_base: parse_base("providers.viacep_base_url", &config.viacep_base_url)?,
            weather_base: parse_base(
                "providers.weather_api_base_url",
                &config.weather_api_base_url,
            )?,
            api_key: config.weather_api_key.clone(),
            propagator,
        })
    }

    /// Resolve `cep` to the name of its locality.
    #[instrument(name = "get_cep_info", skip_all, fields(otel.kind = "client", cep = %cep))]
    pub async fn resolve_location(&self, cep: &Cep) -> Result<String, LookupError> {
        let url = self.viacep_url(cep)?;

        let response = self
            .http
            .get(url)
            .headers(self.propagator.outbound_headers())
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                provider: Provider::ViaCep,
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| LookupError::Transport {
            provider: Provider::ViaCep,
            source,
        })?;

        if !status.is_success() {
            tracing::warn!(status = %status, body = %truncate_body(&body), "ViaCEP error response");
            return Err(LookupError::Status {
                provider: Provider::ViaCep,
                status,
                body: truncate_body(&body),
            });
        }

        let record: ViaCepRecord =
            serde_json::from_str(&body).map_err(|source| LookupError::Decode {
                provider: Provider::ViaCep,
                source,
            })?;

        if record.erro.is_set() {
            tracing::info!("ViaCEP flagged postal code as unknown");
            return Err(LookupError::NotFound(cep.clone()));
        }

        match record.localidade {
            Some(city) if !city.trim().is_empty() => {
                tracing::debug!(city = %city, "Resolved locality");
                Ok(city)
            }
            _ => Err(LookupError::MissingLocality {
                provider: Provider::ViaCep,
            }),
        }
    }

    /// Fetch the current temperature in Celsius for `city`.
    #[instrument(name = "get_weather_info", skip_all, fields(otel.kind = "client", city = %city))]
    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherSample, LookupError> {
        let url = self.weather_url()?;

        // reqwest embeds the full URL (API key included) in its errors.
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .headers(self.propagator.outbound_headers())
            .send()
            .await
            .map_err(|source| {
                let source = source.without_url();
                tracing::error!(error = %source, "Error calling Weather API");
                LookupError::Transport {
                    provider: Provider::WeatherApi,
                    source,
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| LookupError::Transport {
            provider: Provider::WeatherApi,
            source: source.without_url(),
        })?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %truncate_body(&body), "Weather API error");
            return Err(LookupError::Status {
                provider: Provider::WeatherApi,
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: WeatherApiResponse = serde_json::from_str(&body).map_err(|source| {
            tracing::error!(error = %source, body = %truncate_body(&body), "Error decoding Weather API response");
            LookupError::Decode {
                provider: Provider::WeatherApi,
                source,
            }
        })?;

        Ok(WeatherSample {
            temperature_celsius: parsed.current.temp_c,
        })
    }

    fn viacep_url(&self, cep: &Cep) -> Result<Url, LookupError> {
        join(&self.viacep_base, &format!("{}/json/", cep.as_str())).map_err(|source| {
            LookupError::Url {
                provider: Provider::ViaCep,
                source,
            }
        })
    }

    fn weather_url(&self) -> Result<Url, LookupError> {
        join(&self.weather_base, "current.json").map_err(|source| LookupError::Url {
            provider: Provider::WeatherApi,
            source,
        })
    }
}

fn parse_base(field: &'static str, value: &str) -> Result<Url, ClientError> {
    Url::parse(value).map_err(|source| ClientError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}

/// Append `path` to `base`, keeping any path prefix the base already has.
fn join(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let prefix = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{}/{}", prefix, path))
}

/// Subset of the ViaCEP record this service reads.
#[derive(Debug, Deserialize)]
struct ViaCepRecord {
    localidade: Option<String>,
    #[serde(default)]
    erro: ErrorFlag,
}

/// ViaCEP sends its error flag as `true` or as `"true"` depending on the API version.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum ErrorFlag {
    #[default]
    Unset,
    Bool(bool),
    Text(String),
}

impl ErrorFlag {
    fn is_set(&self) -> bool {
        match self {
            ErrorFlag::Unset => false,
            ErrorFlag::Bool(flag) => *flag,
            ErrorFlag::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeatherApiCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherApiResponse {
    current: WeatherApiCurrent,
}
