//! Client configuration loaded from the environment.

use std::env;
use std::time::Duration;

use crate::error::{DriveError, Result};

/// Default backend when `DRIVE_BACKEND_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Connection settings for [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://drive.example.com`.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Optional HTTP/SOCKS proxy URL.
    pub proxy: Option<String>,
}

impl ClientConfig {
    /// Config pointing at `base_url` with default timeout and no proxy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
        }
    }

    /// Read `DRIVE_BACKEND_URL`, `DRIVE_TIMEOUT_SECS` and `DRIVE_PROXY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("DRIVE_BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup("DRIVE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    DriveError::Validation(format!("invalid DRIVE_TIMEOUT_SECS: {raw}"))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let proxy = lookup("DRIVE_PROXY").filter(|v| !v.trim().is_empty());

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            proxy,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_values_from_lookup() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("DRIVE_BACKEND_URL", "https://drive.example.com/api"),
            ("DRIVE_TIMEOUT_SECS", "5"),
            ("DRIVE_PROXY", "socks5://127.0.0.1:1080"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://drive.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
    }

    #[test]
    fn test_invalid_timeout() {
        for raw in ["abc", "0", "-3"] {
            let res = ClientConfig::from_lookup(lookup_from(&[("DRIVE_TIMEOUT_SECS", raw)]));
            assert!(matches!(res, Err(DriveError::Validation(_))), "{raw}");
        }
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("DRIVE_BACKEND_URL", "  "),
            ("DRIVE_PROXY", ""),
        ]))
        .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.proxy.is_none());
    }
}
