//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize telemetry, logging and metrics in dependency order
//! - Bind the listener and serve the role's routes
//! - On signal: drain requests, then flush spans within the deadline

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{Role, ServiceConfig};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics, Telemetry, TelemetryError};

/// Fatal errors while bringing a service up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("telemetry initialization failed: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build server: {0}")]
    Server(#[from] ServerError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run a service for `role` until SIGINT/SIGTERM.
pub async fn run(role: Role, config: ServiceConfig) -> Result<(), StartupError> {
    let service_name = config.service_name(role);

    let telemetry = if config.observability.tracing_enabled {
        Telemetry::init(&config.observability, &service_name)?
    } else {
        Telemetry::disabled()
    };
    logging::init(&config.observability, telemetry.tracer())?;

    tracing::info!(
        role = %role,
        service = %service_name,
        version = env!("CARGO_PKG_VERSION"),
        "cep-weather starting"
    );
    tracing::info!(
        tracing_enabled = telemetry.is_enabled(),
        collector = %config.observability.collector_endpoint(),
        "Telemetry configured"
    );

    if role == Role::Weather && config.providers.weather_api_key.is_empty() {
        tracing::warn!("WEATHER_API_KEY is not set, weather lookups will fail");
    }

    if let Some(address) = &config.observability.metrics_address {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e: std::net::AddrParseError| StartupError::Metrics(e.to_string()))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let address = config.bind_address(role);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let server = HttpServer::new(role, &config, telemetry.propagator())?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let served = server.run(listener, server_shutdown).await;

    telemetry.shutdown().await;
    tracing::info!("Shutdown complete");

    served.map_err(StartupError::Serve)
}
