//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both services.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

/// Which half of the pipeline this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Service A: validates and forwards `POST /cep`.
    Entry,
    /// Service B: resolves `POST /weather` through the providers.
    Weather,
}

impl Role {
    pub fn default_port(self) -> u16 {
        match self {
            Role::Entry => 8080,
            Role::Weather => 8081,
        }
    }

    pub fn default_service_name(self) -> &'static str {
        match self {
            Role::Entry => "service-a",
            Role::Weather => "service-b",
        }
    }

    /// Route served by this role.
    pub fn route(self) -> &'static str {
        match self {
            Role::Entry => "/cep",
            Role::Weather => "/weather",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Entry => f.write_str("entry"),
            Role::Weather => f.write_str("weather"),
        }
    }
}

/// Root configuration for a service process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Where the entry service forwards requests.
    pub downstream: DownstreamConfig,

    /// Postal-code and weather provider endpoints.
    pub providers: ProvidersConfig,

    /// Logging, tracing and metrics settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Bind address for the given role, falling back to the role's default port.
    pub fn bind_address(&self, role: Role) -> String {
        let port = self.listener.port.unwrap_or_else(|| role.default_port());
        format!("{}:{}", self.listener.host, port)
    }

    pub fn service_name(&self, role: Role) -> String {
        self.observability
            .service_name
            .clone()
            .unwrap_or_else(|| role.default_service_name().to_string())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind. Unset means the role default (8080 / 8081).
    pub port: Option<u16>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
        }
    }
}

/// Downstream weather service used by the entry role.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Full URL of the weather service endpoint.
    pub url: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://serviceb:8081/weather".to_string(),
        }
    }
}

/// External providers used by the weather role.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// ViaCEP base URL; the code and `/json/` are appended.
    pub viacep_base_url: String,

    /// WeatherAPI base URL; `/current.json` is appended.
    pub weather_api_base_url: String,

    /// WeatherAPI key.
    pub weather_api_key: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            viacep_base_url: "https://viacep.com.br/ws".to_string(),
            weather_api_base_url: "https://api.weatherapi.com/v1".to_string(),
            weather_api_key: String::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Export spans to the OTLP collector.
    pub tracing_enabled: bool,

    /// OTLP/gRPC collector address, e.g. "otel-collector:4317".
    pub collector_url: String,

    /// `service.name` resource attribute. Unset means the role default.
    pub service_name: Option<String>,

    /// Prometheus exporter bind address. Unset disables the exporter.
    pub metrics_address: Option<String>,

    /// Upper bound for draining spans at shutdown, in seconds.
    pub shutdown_timeout_secs: u64,
}

impl ObservabilityConfig {
    /// Collector endpoint with a scheme, as tonic requires one.
    pub fn collector_endpoint(&self) -> String {
        let url = self.collector_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            tracing_enabled: true,
            collector_url: "otel-collector:4317".to_string(),
            service_name: None,
            metrics_address: None,
            shutdown_timeout_secs: 5,
        }
    }
}
