//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, access log)
//!     → request.rs (decode body, validate CEP)
//!     → entry.rs    (Service A: forward to weather service)
//!       weather.rs  (Service B: ViaCEP + WeatherAPI, convert)
//!     → response.rs (error envelope or JSON body)
//!     → Send to client
//! ```

pub mod entry;
pub mod request;
pub mod response;
pub mod server;
pub mod weather;

pub use request::{RequestUuid, X_REQUEST_ID};
pub use response::ErrorEnvelope;
pub use server::{HttpServer, ServerError};
