//! CEP weather pipeline library.
//!
//! Two services share this crate: the entry service validates a postal code
//! and forwards it, the weather service resolves it to a city and returns
//! the current temperature in Celsius, Fahrenheit and Kelvin.

pub mod client;
pub mod config;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{Role, ServiceConfig};
pub use domain::{validate_cep, Cep, ErrorKind, ServiceError, TemperatureReport};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::{Propagator, Telemetry};
