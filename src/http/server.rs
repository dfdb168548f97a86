//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the process role
//! - Wire up middleware (request ID, access logging)
//! - Build the outbound clients and inject them as handler state
//! - Serve on a bound listener until the shutdown signal fires

use axum::{routing::post, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::client::{self, ClientError, LookupClient, WeatherServiceClient};
use crate::config::{Role, ServiceConfig};
use crate::http::entry::{self, EntryState};
use crate::http::request::RequestUuid;
use crate::http::weather::{self, WeatherState};
use crate::observability::Propagator;

/// Errors building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// HTTP server for one role of the pipeline.
pub struct HttpServer {
    router: Router,
    role: Role,
}

impl HttpServer {
    /// Create a new HTTP server for `role` with the given configuration.
    pub fn new(role: Role, config: &ServiceConfig, propagator: Propagator) -> Result<Self, ServerError> {
        let http = client::http_client()?;

        let routes = match role {
            Role::Entry => {
                let state = EntryState {
                    downstream: WeatherServiceClient::new(
                        &config.downstream.url,
                        http,
                        propagator.clone(),
                    )?,
                    propagator,
                };
                tracing::debug!(downstream = %state.downstream.url(), "Entry routes configured");
                Router::new()
                    .route(entry::ROUTE, post(entry::handle_cep_request))
                    .with_state(state)
            }
            Role::Weather => {
                let state = WeatherState {
                    lookup: LookupClient::new(&config.providers, http, propagator.clone())?,
                    propagator,
                };
                Router::new()
                    .route(weather::ROUTE, post(weather::handle_weather_request))
                    .with_state(state)
            }
        };

        Ok(Self {
            router: Self::build_router(routes),
            role,
        })
    }

    /// Wrap the role's routes with the shared middleware layers.
    fn build_router(routes: Router) -> Router {
        routes
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(RequestUuid))
    }

    /// The fully layered router, for serving or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests finish before this returns.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            role = %self.role,
            route = self.role.route(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
