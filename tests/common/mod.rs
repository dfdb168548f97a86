//! Shared utilities for integration testing.
//!
//! Mock providers are small Axum servers on ephemeral ports. They record the
//! `traceparent` header of every request so tests can follow a trace.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cep_weather::config::{Role, ServiceConfig};
use cep_weather::{HttpServer, Propagator, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-key";

/// Known postal codes served by the mock ViaCEP.
pub const CEP_SAO_PAULO: &str = "01001000";
pub const CEP_UNKNOWN: &str = "99999999";
pub const CEP_UNKNOWN_TEXT_FLAG: &str = "88888888";
pub const CEP_VIACEP_DOWN: &str = "50000000";
pub const CEP_NO_WEATHER: &str = "11111111";
pub const CEP_GARBLED: &str = "22222222";

/// A request seen by a mock provider.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub traceparent: Option<String>,
}

pub type SeenLog = Arc<Mutex<Vec<Seen>>>;

fn record(log: &SeenLog, path: String, headers: &HeaderMap) {
    let traceparent = headers
        .get("traceparent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.lock().unwrap().push(Seen { path, traceparent });
}

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Address that refuses connections.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn viacep(
    State(log): State<SeenLog>,
    Path(cep): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&log, format!("/ws/{}/json/", cep), &headers);
    match cep.as_str() {
        CEP_SAO_PAULO => Json(json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP"
        }))
        .into_response(),
        CEP_NO_WEATHER => Json(json!({ "cep": "11111-111", "localidade": "Atlantis" })).into_response(),
        CEP_UNKNOWN => Json(json!({ "erro": true })).into_response(),
        CEP_UNKNOWN_TEXT_FLAG => Json(json!({ "erro": "true" })).into_response(),
        CEP_VIACEP_DOWN => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        CEP_GARBLED => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => (StatusCode::BAD_REQUEST, "bad request").into_response(),
    }
}

async fn weather_api(
    State(log): State<SeenLog>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    record(&log, format!("/v1/current.json?q={}", q), &headers);

    if params.get("key").map(String::as_str) != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": 2006, "message": "API key is invalid."}})),
        )
            .into_response();
    }

    match q.as_str() {
        "São Paulo" => Json(json!({
            "location": { "name": "Sao Paulo", "country": "Brazil" },
            "current": { "temp_c": 28.5, "temp_f": 83.3 }
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 1006, "message": "No matching location found."}})),
        )
            .into_response(),
    }
}

/// Mock ViaCEP (`/ws/...`) and WeatherAPI (`/v1/...`) on one port.
pub struct MockProviders {
    pub addr: SocketAddr,
    pub seen: SeenLog,
}

impl MockProviders {
    pub async fn start() -> Self {
        let seen: SeenLog = Arc::default();
        let router = Router::new()
            .route("/ws/{cep}/json/", get(viacep))
            .route("/v1/current.json", get(weather_api))
            .with_state(seen.clone());
        let addr = serve(router).await;
        Self { addr, seen }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn viacep_base(&self) -> String {
        format!("http://{}/ws", self.addr)
    }

    pub fn weather_base(&self) -> String {
        format!("http://{}/v1", self.addr)
    }
}

/// Mock weather service that always answers with `status` and `body`.
pub async fn start_fixed_downstream(status: u16, body: &'static str) -> SocketAddr {
    let router = Router::new().route(
        "/weather",
        post(move || async move {
            (
                StatusCode::from_u16(status).unwrap(),
                [("content-type", "application/json")],
                body,
            )
        }),
    );
    serve(router).await
}

/// A running service; dropping it stops the server.
pub struct TestService {
    pub addr: SocketAddr,
    _shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub fn weather_config(providers: &MockProviders) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.providers.viacep_base_url = providers.viacep_base();
    config.providers.weather_api_base_url = providers.weather_base();
    config.providers.weather_api_key = API_KEY.to_string();
    config.observability.tracing_enabled = false;
    config
}

pub fn entry_config(downstream: SocketAddr) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.downstream.url = format!("http://{}/weather", downstream);
    config.observability.tracing_enabled = false;
    config
}

pub async fn start_service(role: Role, config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(role, &config, Propagator::new()).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    TestService {
        addr,
        _shutdown: shutdown,
    }
}

/// Weather service wired to `providers`.
pub async fn start_weather(providers: &MockProviders) -> TestService {
    start_service(Role::Weather, weather_config(providers)).await
}

/// Entry service forwarding to `downstream`.
pub async fn start_entry(downstream: SocketAddr) -> TestService {
    start_service(Role::Entry, entry_config(downstream)).await
}

/// POST `{"cep": cep}` and return status plus parsed JSON body.
pub async fn post_cep(url: &str, cep: &str) -> (u16, Value) {
    post_raw(url, json!({ "cep": cep }).to_string()).await
}

pub async fn post_raw(url: &str, body: String) -> (u16, Value) {
    let res = reqwest::Client::new()
        .post(url)
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .expect("service unreachable");
    let status = res.status().as_u16();
    let body = res.json::<Value>().await.expect("JSON body");
    (status, body)
}
