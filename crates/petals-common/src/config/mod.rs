//! Configuration structs

mod client_config;

pub use client_config::{ClientConfig, ConfigError, Environment, DEFAULT_API_URL, DEFAULT_GATEWAY_URL};
