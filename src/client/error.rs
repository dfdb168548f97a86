//! Client error types and their mapping onto [`ErrorKind`].

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::{Cep, ErrorKind, ServiceError};

/// External provider a lookup talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    ViaCep,
    WeatherApi,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::ViaCep => f.write_str("ViaCEP"),
            Provider::WeatherApi => f.write_str("WeatherAPI"),
        }
    }
}

/// Errors building a client from configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL for {field}: '{value}'")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),
}

/// Errors from the postal-code and weather providers.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("postal code {0} not found")]
    NotFound(Cep),

    #[error("request to {provider} failed")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: Provider,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode {provider} response")]
    Decode {
        provider: Provider,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response has no locality")]
    MissingLocality { provider: Provider },

    #[error("invalid {provider} URL")]
    Url {
        provider: Provider,
        #[source]
        source: url::ParseError,
    },
}

impl LookupError {
    /// Only a provider "not found" flag is distinct; everything else is internal.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

impl From<LookupError> for ServiceError {
    fn from(err: LookupError) -> Self {
        ServiceError::with_cause(err.kind(), err)
    }
}

/// Errors forwarding a request to the weather service.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("request to weather service failed")]
    Transport(#[from] reqwest::Error),

    #[error("weather service returned status {0}")]
    Status(StatusCode),
}

impl ForwardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForwardError::Status(status) => {
                ErrorKind::from_downstream_status(*status).unwrap_or(ErrorKind::Internal)
            }
            ForwardError::Transport(_) => ErrorKind::Internal,
        }
    }
}

impl From<ForwardError> for ServiceError {
    fn from(err: ForwardError) -> Self {
        ServiceError::with_cause(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_not_found_stays_distinct() {
        let cep = Cep::parse("99999999").unwrap();
        let err = LookupError::NotFound(cep);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "postal code 99999999 not found");

        let service: ServiceError = err.into();
        assert!(service == ErrorKind::NotFound);
    }

    #[test]
    fn lookup_failures_collapse_to_internal() {
        let status = LookupError::Status {
            provider: Provider::WeatherApi,
            status: StatusCode::BAD_REQUEST,
            body: "{}".into(),
        };
        assert_eq!(status.kind(), ErrorKind::Internal);
        assert_eq!(status.to_string(), "WeatherAPI returned status 400 Bad Request: {}");

        let missing = LookupError::MissingLocality {
            provider: Provider::ViaCep,
        };
        assert_eq!(missing.kind(), ErrorKind::Internal);

        let decode = LookupError::Decode {
            provider: Provider::ViaCep,
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        let service = ServiceError::from(decode);
        assert!(service == ErrorKind::Internal);
        assert!(service.detail().starts_with("internal: failed to decode ViaCEP response: "));
    }

    #[test]
    fn forward_status_is_remapped() {
        assert_eq!(
            ForwardError::Status(StatusCode::NOT_FOUND).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ForwardError::Status(StatusCode::UNPROCESSABLE_ENTITY).kind(),
            ErrorKind::UnprocessableInput
        );
        assert_eq!(
            ForwardError::Status(StatusCode::BAD_REQUEST).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            ForwardError::Status(StatusCode::INTERNAL_SERVER_ERROR).kind(),
            ErrorKind::Internal
        );
    }
}
