//! Server configuration.
//!
//! Bind address and external collaborator timeouts, overridable from the environment.
use std::env;
use std::time::Duration;

use log::warn;

/// Default bind host.
pub const HOST: &str = "127.0.0.1";

/// Default bind port.
pub const PORT: u16 = 8080;

/// Time (in seconds) an external combat session may run before it is abandoned.
pub const COMBAT_TIMEOUT_SECS: u64 = 30;

/// Time (in seconds) a finished match stays readable before it is dropped.
pub const FINISHED_MATCH_RETENTION_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub combat_timeout: Duration,
    pub finished_retention: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            combat_timeout: Duration::from_secs(COMBAT_TIMEOUT_SECS),
            finished_retention: Duration::from_secs(FINISHED_MATCH_RETENTION_SECS),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from `HOST`, `PORT`, `COMBAT_TIMEOUT_SECS` and
    /// `FINISHED_MATCH_RETENTION_SECS`, falling back to the defaults for missing or malformed values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = env::var("HOST") {
            if !host.trim().is_empty() {
                config.host = host;
            }
        }
        if let Ok(port) = env::var("PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("[Config] Ignoring invalid PORT={}", port),
            }
        }
        if let Ok(secs) = env::var("COMBAT_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => config.combat_timeout = Duration::from_secs(secs),
                Err(_) => warn!("[Config] Ignoring invalid COMBAT_TIMEOUT_SECS={}", secs),
            }
        }
        if let Ok(secs) = env::var("FINISHED_MATCH_RETENTION_SECS") {
            match secs.parse() {
                Ok(secs) => config.finished_retention = Duration::from_secs(secs),
                Err(_) => warn!("[Config] Ignoring invalid FINISHED_MATCH_RETENTION_SECS={}", secs),
            }
        }
        config
    }
}
