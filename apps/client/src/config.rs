use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STATE_FILE: &str = ".jobfit/state.json";

/// Client configuration loaded from environment variables (and `.env`).
/// Every setting has a default; the base URL is the only one the
/// synchronization layer itself depends on.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub state_file: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base_url: env_or("API_BASE_URL", DEFAULT_API_BASE_URL),
            request_timeout: Duration::from_secs(timeout_secs),
            state_file: PathBuf::from(env_or("JOBFIT_STATE_FILE", DEFAULT_STATE_FILE)),
            rust_log: env_or("RUST_LOG", "warn"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            rust_log: "warn".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.state_file, PathBuf::from(".jobfit/state.json"));
    }

    #[test]
    fn test_env_or_ignores_blank_values() {
        assert_eq!(
            env_or("JOBFIT_CLIENT_TEST_SURELY_UNSET", "fallback"),
            "fallback"
        );
    }
}
