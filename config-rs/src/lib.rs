//! config-rs/lib.rs
//! Shared configuration utilities for the NetOptimize services
//! Provides `.env` loading, typed environment lookups and bind address resolution

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors raised while reading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: String, value: String },

    #[error("Failed to load .env file: {0}")]
    Dotenv(String),
}

/// Load variables from a `.env` file in the working directory or its parents.
///
/// Returns the file that was read, or `None` when there is none. Variables already
/// present in the process environment take precedence. Nothing is logged here since
/// this runs before the subscriber exists; callers report the outcome.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenv::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}

/// Load a specific env file; a missing file is not an error
pub fn load_dotenv_from(path: &Path) -> Result<Option<PathBuf>, ConfigError> {
    match dotenv::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(ConfigError::Dotenv(format!("{}: {}", path.display(), err))),
    }
}

/// Read a variable that must be set and non-empty
pub fn require_env(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name.to_string())),
    }
}

/// Read and parse an optional variable
///
/// Unset or empty variables yield `Ok(None)`; a value that does not parse is an error
/// rather than a silent fallback.
pub fn optional_env<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

/// `<SERVICE>_SERVICE_PORT`, or `default_port` when unset, blank or not a port
pub fn get_service_port(service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_SERVICE_PORT", service_name.to_uppercase());
    match optional_env::<u16>(&var_name) {
        Ok(Some(port)) => port,
        Ok(None) => default_port,
        Err(err) => {
            log::warn!("{}, using default port {}", err, default_port);
            default_port
        }
    }
}

/// Create a SocketAddr for binding a service
///
/// `<SERVICE>_SERVICE_ADDR` may hold a full `host:port` (optionally prefixed with
/// `http://` or `https://`); otherwise all interfaces are bound on the resolved port.
pub fn get_bind_address(service_name: &str, default_port: u16) -> SocketAddr {
    let var_name = format!("{}_SERVICE_ADDR", service_name.to_uppercase());

    if let Ok(addr_str) = env::var(&var_name) {
        let bare = addr_str
            .strip_prefix("http://")
            .or_else(|| addr_str.strip_prefix("https://"))
            .unwrap_or(&addr_str);
        match bare.parse::<SocketAddr>() {
            Ok(addr) => return addr,
            Err(_) => log::warn!("Invalid address format in {}, using default", var_name),
        }
    }

    let port = get_service_port(service_name, default_port);
    SocketAddr::from(([0, 0, 0, 0], port))
}
