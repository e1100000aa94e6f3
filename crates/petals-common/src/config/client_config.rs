//! Client configuration
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

/// Default gateway endpoint, API v8 with JSON encoding
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=8&encoding=json";

/// Default REST base URL
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v8";

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    pub env: Environment,
    /// Bot token, sent on identify and as the REST `Authorization` header
    pub token: String,
    /// Number of shards; shard ids run `0..shard_count`
    pub shard_count: u32,
    pub gateway_url: String,
    pub api_url: String,
    /// Gateway intents bitmask
    pub intents: u64,
    /// How many nested referenced messages get materialized
    pub max_reference_depth: usize,
    pub request_timeout: Duration,
    /// Restart a shard when its connection closes with a reconnectable code
    pub restart_on_disconnect: bool,
}

// Default value functions
fn default_shard_count() -> u32 {
    1
}

fn default_intents() -> u64 {
    // GUILDS | GUILD_MESSAGES
    513
}

fn default_max_reference_depth() -> usize {
    3
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl ClientConfig {
    /// Configuration with defaults for everything but the token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            env: Environment::default(),
            token: token.into(),
            shard_count: default_shard_count(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            intents: default_intents(),
            max_reference_depth: default_max_reference_depth(),
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
            restart_on_disconnect: true,
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `PETALS_TOKEN` is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("PETALS_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingVar("PETALS_TOKEN"))?;

        let mut config = Self::new(token);

        if let Some(raw) = lookup("APP_ENV") {
            config.env = Environment::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw.clone()))?;
        }
        if let Some(count) = parse_var(&lookup, "PETALS_SHARD_COUNT")? {
            if count == 0 {
                return Err(ConfigError::InvalidValue(
                    "PETALS_SHARD_COUNT",
                    "must be at least 1".to_string(),
                ));
            }
            config.shard_count = count;
        }
        if let Some(url) = lookup("PETALS_GATEWAY_URL") {
            config.gateway_url = url;
        }
        if let Some(url) = lookup("PETALS_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(intents) = parse_var(&lookup, "PETALS_INTENTS")? {
            config.intents = intents;
        }
        if let Some(depth) = parse_var(&lookup, "PETALS_MAX_REFERENCE_DEPTH")? {
            config.max_reference_depth = depth;
        }
        if let Some(secs) = parse_var(&lookup, "PETALS_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(restart) = parse_var(&lookup, "PETALS_RESTART_ON_DISCONNECT")? {
            config.restart_on_disconnect = restart;
        }

        Ok(config)
    }

    /// Shard ids this deployment runs
    pub fn shard_ids(&self) -> std::ops::Range<u32> {
        0..self.shard_count
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("env", &self.env)
            .field("token", &"<redacted>")
            .field("shard_count", &self.shard_count)
            .field("gateway_url", &self.gateway_url)
            .field("api_url", &self.api_url)
            .field("intents", &self.intents)
            .field("max_reference_depth", &self.max_reference_depth)
            .field("request_timeout", &self.request_timeout)
            .field("restart_on_disconnect", &self.restart_on_disconnect)
            .finish()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
