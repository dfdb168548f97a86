//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, fmt layer)
//!     → telemetry.rs (spans exported to the OTLP collector)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Across the network hop:
//!     → propagation.rs (W3C traceparent/tracestate + baggage headers)
//! ```
//!
//! # Design Decisions
//! - One `tracing` registry feeds both logs and OpenTelemetry spans
//! - The tracer provider and propagator are constructed once and passed
//!   down, never stored in a mutable global
//! - Only this crate's spans are exported; framework spans stay in the logs

pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod telemetry;

pub use propagation::Propagator;
pub use telemetry::{Telemetry, TelemetryError};
