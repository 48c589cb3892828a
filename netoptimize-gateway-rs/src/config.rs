//! Gateway configuration loaded from the process environment
//!
//! Reads:
//! - GOOGLE_API_KEY: Gemini API key (required)
//! - GEMINI_MODEL: model name (default: "gemini-1.5-flash")
//! - GEMINI_API_BASE: API base URL (default: the public v1beta endpoint)
//! - GEMINI_TEMPERATURE: sampling temperature (default: provider default)
//! - LLM_REQUEST_TIMEOUT_SECS: outbound request timeout (default: none)
//! - NETOPTIMIZE_SERVICE_PORT / NETOPTIMIZE_SERVICE_ADDR: listener settings

use std::net::SocketAddr;
use std::time::Duration;

use config_rs::{get_bind_address, optional_env, require_env, ConfigError};

pub const SERVICE_NAME: &str = "NETOPTIMIZE";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: Option<f32>,
    pub request_timeout: Option<Duration>,
    pub bind_addr: SocketAddr,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_env("GOOGLE_API_KEY")?;
        let model = optional_env::<String>("GEMINI_MODEL")?
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = optional_env::<String>("GEMINI_API_BASE")?
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let temperature = optional_env::<f32>("GEMINI_TEMPERATURE")?;
        let request_timeout =
            optional_env::<u64>("LLM_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            api_key,
            model,
            api_base,
            temperature,
            request_timeout,
            bind_addr: get_bind_address(SERVICE_NAME, DEFAULT_PORT),
        })
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 7] = [
        "GOOGLE_API_KEY",
        "GEMINI_MODEL",
        "GEMINI_API_BASE",
        "GEMINI_TEMPERATURE",
        "LLM_REQUEST_TIMEOUT_SECS",
        "NETOPTIMIZE_SERVICE_PORT",
        "NETOPTIMIZE_SERVICE_ADDR",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_missing_api_key_is_fatal() {
        clear_env();

        let err = GatewayConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref name) if name == "GOOGLE_API_KEY"));
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        env::set_var("GOOGLE_API_KEY", "test-key");

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.temperature, None);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("GOOGLE_API_KEY", "test-key");
        env::set_var("GEMINI_MODEL", "gemini-1.5-pro");
        env::set_var("GEMINI_API_BASE", "http://127.0.0.1:9999/v1beta/");
        env::set_var("GEMINI_TEMPERATURE", "0.2");
        env::set_var("LLM_REQUEST_TIMEOUT_SECS", "30");
        env::set_var("NETOPTIMIZE_SERVICE_PORT", "8080");

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.api_base, "http://127.0.0.1:9999/v1beta");
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.bind_addr.port(), 8080);

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("test-key"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_temperature_is_rejected() {
        clear_env();
        env::set_var("GOOGLE_API_KEY", "test-key");
        env::set_var("GEMINI_TEMPERATURE", "warm");

        assert!(matches!(
            GatewayConfig::from_env(),
            Err(ConfigError::Invalid { .. })
        ));

        clear_env();
    }
}
