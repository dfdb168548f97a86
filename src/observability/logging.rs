//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Stack the OpenTelemetry layer on the same registry when tracing is on
//! - Configure log level and format from config and environment
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - JSON format for production, pretty format for development
//! - The level filter is per-layer on the output; span export has its own
//!   fixed filter so a quiet log level still yields connected traces

use opentelemetry_sdk::trace::Tracer;
use tracing::Level;
use tracing_subscriber::{
    filter::{EnvFilter, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::telemetry::TelemetryError;

/// Install the global subscriber.
///
/// The level filter applies to log output only. When `tracer` is given,
/// every span and event from this crate is exported through OpenTelemetry
/// regardless of the log level.
pub fn init(config: &ObservabilityConfig, tracer: Option<Tracer>) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let output: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Pretty => fmt::layer().boxed(),
    };

    let otel = tracer.map(|tracer| {
        tracing_opentelemetry::layer()
            .with_tracer(tracer)
            .with_filter(traced_targets())
    });

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .with(otel)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))
}

/// Targets exported as spans: everything this crate emits.
fn traced_targets() -> Targets {
    Targets::new().with_target(env!("CARGO_CRATE_NAME"), Level::TRACE)
}

/// Expand a bare level into per-crate directives; pass full directives through.
pub fn default_directives(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{}={level},tower_http={level}", env!("CARGO_CRATE_NAME"))
    }
}
