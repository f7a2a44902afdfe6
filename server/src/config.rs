use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Server configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity allowed to finalize.
    pub owner: String,
    /// Submission cutoff, Unix seconds.
    pub deadline: i64,
    /// Minimum distinct signatures before finalization is allowed.
    pub required_count: usize,
    pub listen: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let owner = require("COVENANT_OWNER")?;
        let deadline = require("COVENANT_DEADLINE").and_then(|raw| parse("COVENANT_DEADLINE", &raw))?;
        let required_count =
            require("COVENANT_REQUIRED_COUNT").and_then(|raw| parse("COVENANT_REQUIRED_COUNT", &raw))?;
        let listen_raw = env::var("COVENANT_LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN.to_string());
        let listen = parse("COVENANT_LISTEN", &listen_raw)?;
        Ok(Self { owner, deadline, required_count, listen })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid { var, message: e.to_string() })
}
