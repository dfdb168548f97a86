//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{Role, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration the way the binaries do: defaults, then the optional
/// file, then process environment overrides, then validation.
pub fn load_from_env(path: Option<&Path>, role: Role) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => ServiceConfig::default(),
    };
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config, role).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables on `config`.
///
/// `lookup` abstracts the environment so tests do not touch process state.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.listener.port = Some(parse("PORT", port)?);
    }
    if let Some(url) = lookup("SERVICE_B_URL") {
        config.downstream.url = url;
    }
    if let Some(key) = lookup("WEATHER_API_KEY") {
        config.providers.weather_api_key = key;
    }
    if let Some(url) = lookup("VIACEP_BASE_URL") {
        config.providers.viacep_base_url = url;
    }
    if let Some(url) = lookup("WEATHER_API_BASE_URL") {
        config.providers.weather_api_base_url = url;
    }

    let obs = &mut config.observability;
    if let Some(url) = lookup("OTEL_COLLECTOR_URL") {
        obs.collector_url = url;
    }
    if let Some(enabled) = lookup("OTEL_ENABLED") {
        obs.tracing_enabled = parse("OTEL_ENABLED", enabled)?;
    }
    if let Some(name) = lookup("OTEL_SERVICE_NAME") {
        obs.service_name = Some(name);
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        obs.log_level = level;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        obs.log_format = parse("LOG_FORMAT", format)?;
    }
    if let Some(addr) = lookup("METRICS_ADDRESS") {
        obs.metrics_address = (!addr.is_empty()).then_some(addr);
    }
    if let Some(secs) = lookup("SHUTDOWN_TIMEOUT_SECS") {
        obs.shutdown_timeout_secs = parse("SHUTDOWN_TIMEOUT_SECS", secs)?;
    }

    Ok(())
}

fn parse<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
