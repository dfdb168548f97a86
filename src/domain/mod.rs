//! Domain types shared by both services.
//!
//! # Data Flow
//! ```text
//! request body
//!     → cep.rs (decode + validate into Cep)
//!     → [lookup client resolves city and temperature]
//!     → temperature.rs (TemperatureReport derived from Celsius)
//!
//! Any failure:
//!     → error.rs (ErrorKind → status code + public message)
//! ```
//!
//! # Design Decisions
//! - `Cep` can only be constructed through validation
//! - Fahrenheit/Kelvin are derived at construction, never stored independently
//! - Error kinds are a closed enum compared by value

pub mod cep;
pub mod error;
pub mod temperature;

pub use cep::{validate_cep, Cep, CepRequest};
pub use error::{ErrorKind, ServiceError};
pub use temperature::{TemperatureReport, WeatherSample};
