//! Span tree of one request across both services.

mod common;

use std::sync::OnceLock;
use std::time::Duration;

use cep_weather::config::ObservabilityConfig;
use cep_weather::observability::logging;
use common::*;
use opentelemetry::trace::{SpanId, TraceId, TracerProvider as _};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::TracerProvider;

static TRACING: OnceLock<(TracerProvider, InMemorySpanExporter)> = OnceLock::new();

/// Install a subscriber whose spans land in memory.
fn exporter() -> &'static InMemorySpanExporter {
    let (_, exporter) = TRACING.get_or_init(|| {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let config = ObservabilityConfig {
            log_level: "warn".to_string(),
            ..ObservabilityConfig::default()
        };
        logging::init(&config, Some(provider.tracer("span-tree"))).unwrap();
        (provider, exporter)
    });
    exporter
}

fn attribute(span: &SpanData, key: &str) -> Option<String> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| kv.value.to_string())
}

/// Spans of the trace rooted at the entry handler that served `cep`.
async fn trace_for(cep: &str, expected: usize) -> Vec<SpanData> {
    for _ in 0..100 {
        let spans = exporter().get_finished_spans().unwrap();
        let root = spans.iter().find(|s| {
            s.name == "handle_cep_request" && attribute(s, "cep").as_deref() == Some(cep)
        });
        if let Some(root) = root {
            let trace_id: TraceId = root.span_context.trace_id();
            let trace: Vec<SpanData> = spans
                .iter()
                .filter(|s| s.span_context.trace_id() == trace_id)
                .cloned()
                .collect();
            if trace.len() >= expected {
                return trace;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("trace for {} never completed", cep);
}

fn named<'a>(spans: &'a [SpanData], name: &str) -> &'a SpanData {
    let matching: Vec<&SpanData> = spans.iter().filter(|s| s.name == name).collect();
    assert_eq!(matching.len(), 1, "expected one {} span", name);
    matching[0]
}

fn parent_of(child: &SpanData, parent: &SpanData) -> bool {
    child.parent_span_id == parent.span_context.span_id()
}

fn status_events(span: &SpanData) -> Vec<String> {
    span.events
        .events
        .iter()
        .filter(|e| e.name == "error_response")
        .filter_map(|e| {
            e.attributes
                .iter()
                .find(|kv| kv.key.as_str() == "http.status_code")
                .map(|kv| kv.value.to_string())
        })
        .collect()
}

#[tokio::test]
async fn resolved_request_forms_one_tree() {
    exporter();
    let providers = MockProviders::start().await;
    let weather = start_weather(&providers).await;
    let entry = start_entry(weather.addr).await;

    let (status, _) = post_cep(&entry.url("/cep"), CEP_SAO_PAULO).await;
    assert_eq!(status, 200);

    let spans = trace_for(CEP_SAO_PAULO, 5).await;
    assert_eq!(spans.len(), 5);

    let root = named(&spans, "handle_cep_request");
    let forward = named(&spans, "call_service_b");
    let handler = named(&spans, "handle_weather_request");
    let cep_info = named(&spans, "get_cep_info");
    let weather_info = named(&spans, "get_weather_info");

    assert_eq!(root.parent_span_id, SpanId::INVALID);
    assert!(parent_of(forward, root));
    assert!(parent_of(handler, forward));
    assert!(parent_of(cep_info, handler));
    assert!(parent_of(weather_info, handler));

    assert_eq!(attribute(handler, "city").as_deref(), Some("São Paulo"));
    assert!(status_events(root).is_empty());
    assert!(status_events(handler).is_empty());
}

#[tokio::test]
async fn not_found_is_recorded_on_both_handlers() {
    exporter();
    let providers = MockProviders::start().await;
    let weather = start_weather(&providers).await;
    let entry = start_entry(weather.addr).await;

    let (status, _) = post_cep(&entry.url("/cep"), CEP_UNKNOWN).await;
    assert_eq!(status, 404);

    let spans = trace_for(CEP_UNKNOWN, 4).await;
    assert_eq!(spans.len(), 4);
    assert!(spans.iter().all(|s| s.name != "get_weather_info"));

    let root = named(&spans, "handle_cep_request");
    let handler = named(&spans, "handle_weather_request");
    assert!(parent_of(named(&spans, "get_cep_info"), handler));

    assert_eq!(status_events(root), vec!["404".to_string()]);
    assert_eq!(status_events(handler), vec!["404".to_string()]);
}
