//! # petals-common
//!
//! Shared utilities: client configuration and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{ClientConfig, ConfigError, Environment, DEFAULT_API_URL, DEFAULT_GATEWAY_URL};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
