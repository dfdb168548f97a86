//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the per-process tracer provider bound to the OTLP/gRPC exporter
//! - Hand out the tracer for the subscriber and the propagator for handlers
//! - Drain buffered spans at shutdown within a bounded timeout
//!
//! # Design Decisions
//! - Always-on sampling, batch export on the Tokio runtime
//! - Exporter connects lazily: a missing collector never blocks startup
//! - Shutdown failures are logged, never fatal

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{self as sdktrace, Sampler, Tracer};
use opentelemetry_sdk::{runtime, Resource};
use thiserror::Error;

use crate::config::ObservabilityConfig;
use crate::observability::propagation::Propagator;

/// Errors raised while setting up observability.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to create OTLP exporter for {endpoint}: {reason}")]
    Exporter { endpoint: String, reason: String },

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Process-wide tracing state.
///
/// Created once at startup and shut down once at exit.
pub struct Telemetry {
    provider: Option<sdktrace::TracerProvider>,
    tracer: Option<Tracer>,
    propagator: Propagator,
    shutdown_timeout: Duration,
}

impl Telemetry {
    /// Build the provider with a batching OTLP/gRPC exporter.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn init(config: &ObservabilityConfig, service_name: &str) -> Result<Self, TelemetryError> {
        let endpoint = config.collector_endpoint();

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint.clone())
            .build()
            .map_err(|e| TelemetryError::Exporter {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        #[allow(deprecated)]
        let provider = sdktrace::TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_config(trace_config(service_name))
            .build();

        Ok(Self::from_provider(
            provider,
            service_name,
            Duration::from_secs(config.shutdown_timeout_secs),
        ))
    }

    /// Spans are created and propagated but never exported.
    pub fn without_exporter(service_name: &str) -> Self {
        #[allow(deprecated)]
        let provider = sdktrace::TracerProvider::builder()
            .with_config(trace_config(service_name))
            .build();

        Self::from_provider(provider, service_name, Duration::from_secs(1))
    }

    /// No tracer at all; propagation injects nothing.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            tracer: None,
            propagator: Propagator::new(),
            shutdown_timeout: Duration::from_secs(1),
        }
    }

    fn from_provider(
        provider: sdktrace::TracerProvider,
        service_name: &str,
        shutdown_timeout: Duration,
    ) -> Self {
        let tracer = provider.tracer(service_name.to_string());
        Self {
            provider: Some(provider),
            tracer: Some(tracer),
            propagator: Propagator::new(),
            shutdown_timeout,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Tracer for the `tracing-opentelemetry` layer.
    pub fn tracer(&self) -> Option<Tracer> {
        self.tracer.clone()
    }

    pub fn propagator(&self) -> Propagator {
        self.propagator.clone()
    }

    /// Flush and close the exporter, giving up after the configured timeout.
    pub async fn shutdown(self) {
        let Some(provider) = self.provider else {
            return;
        };

        // The SDK blocks while it flushes, keep it off the async workers.
        let drain = tokio::task::spawn_blocking(move || provider.shutdown().map_err(|e| e.to_string()));

        match tokio::time::timeout(self.shutdown_timeout, drain).await {
            Ok(Ok(Ok(()))) => tracing::info!("Tracer provider shut down"),
            Ok(Ok(Err(error))) => {
                tracing::warn!(error = %error, "Error shutting down tracer provider")
            }
            Ok(Err(error)) => {
                tracing::warn!(error = %error, "Tracer shutdown task failed")
            }
            Err(_) => tracing::warn!(
                timeout_secs = self.shutdown_timeout.as_secs(),
                "Tracer provider shutdown timed out, dropping buffered spans"
            ),
        }
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.is_enabled())
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

#[allow(deprecated)]
fn trace_config(service_name: &str) -> sdktrace::Config {
    sdktrace::Config::default()
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.to_string(),
        )]))
}
