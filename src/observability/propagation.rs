//! Trace context propagation across the service hop.
//!
//! Inbound: extract `traceparent`/`tracestate`/`baggage` headers and make
//! them the parent of the handler span. Outbound: serialize the current
//! span's context into the request headers.

use std::sync::Arc;

use axum::http::HeaderMap;
use opentelemetry::propagation::{TextMapCompositePropagator, TextMapPropagator};
use opentelemetry::Context;
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Composite W3C Trace Context + Baggage propagator.
#[derive(Clone)]
pub struct Propagator {
    inner: Arc<TextMapCompositePropagator>,
}

impl Propagator {
    pub fn new() -> Self {
        let inner = TextMapCompositePropagator::new(vec![
            Box::new(TraceContextPropagator::new()),
            Box::new(BaggagePropagator::new()),
        ]);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Read the remote context from inbound headers.
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.inner.extract(&HeaderExtractor(headers))
    }

    /// Parent `span` under the context carried by `headers`.
    ///
    /// Must run before the span is first entered.
    pub fn set_parent(&self, span: &tracing::Span, headers: &HeaderMap) {
        span.set_parent(self.extract(headers));
    }

    pub fn inject_context(&self, cx: &Context, headers: &mut HeaderMap) {
        self.inner.inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Write the context of `span` into `headers`.
    pub fn inject(&self, span: &tracing::Span, headers: &mut HeaderMap) {
        self.inject_context(&span.context(), headers);
    }

    /// Headers carrying the current span's context, for an outbound request.
    pub fn outbound_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.inject(&tracing::Span::current(), &mut headers);
        headers
    }
}

impl Default for Propagator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Propagator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Propagator(tracecontext,baggage)")
    }
}
