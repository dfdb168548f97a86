//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every URL the role uses parses as http(s)
//! - Validate value ranges (shutdown timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: (ServiceConfig, Role) → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{Role, ServiceConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate the parts of `config` that `role` depends on.
pub fn validate_config(config: &ServiceConfig, role: Role) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match role {
        Role::Entry => check_url("downstream.url", &config.downstream.url, &mut errors),
        Role::Weather => {
            check_url(
                "providers.viacep_base_url",
                &config.providers.viacep_base_url,
                &mut errors,
            );
            check_url(
                "providers.weather_api_base_url",
                &config.providers.weather_api_base_url,
                &mut errors,
            );
        }
    }

    let obs = &config.observability;
    if obs.tracing_enabled {
        if obs.collector_url.trim().is_empty() {
            errors.push(ValidationError::Empty {
                field: "observability.collector_url",
            });
        } else {
            check_url(
                "observability.collector_url",
                &obs.collector_endpoint(),
                &mut errors,
            );
        }
    }

    if obs.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "observability.shutdown_timeout_secs",
        });
    }

    if let Some(addr) = &obs.metrics_address {
        if addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: addr.clone(),
            });
        }
    }

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "listener.host",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false);

    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
