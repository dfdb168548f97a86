//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides (loader.rs, PORT / SERVICE_B_URL / ...)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError};
pub use schema::{
    DownstreamConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProvidersConfig, Role,
    ServiceConfig,
};
pub use validation::{validate_config, ValidationError};
