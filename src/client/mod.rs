//! Outbound HTTP clients.
//!
//! # Data Flow
//! ```text
//! Entry role:
//!     handler → downstream.rs (POST {"cep"} to the weather service)
//!
//! Weather role:
//!     handler → lookup.rs resolve_location (ViaCEP)
//!             → lookup.rs fetch_weather (WeatherAPI)
//! ```
//!
//! # Design Decisions
//! - Every call runs in its own client span and injects trace headers
//! - One pooled `reqwest::Client` per process, cloned into each client
//! - Errors keep their cause; `kind()` decides what the caller sees
//! - No retries and no client-side timeout: a call lives exactly as long as
//!   the request that issued it

pub mod downstream;
pub mod error;
pub mod lookup;

pub use downstream::WeatherServiceClient;
pub use error::{ClientError, ForwardError, LookupError, Provider};
pub use lookup::LookupClient;

/// Build the shared outbound HTTP client.
pub fn http_client() -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ClientError::Build)
}

/// Truncate a provider body before it goes into logs or errors.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
