//! # Client Configuration
//!
//! [`ClientConfig`] gathers the knobs a deployment tunes: where the API lives, how long a
//! request may take, what to do with references the server did not side-load, and the
//! page size to ask for when walking listings.
//!
//! It can be built three ways:
//!
//! - in code, starting from [`ClientConfig::new`] and chaining setters
//! - deserialized with `serde` from whatever format the application uses (missing keys
//!   take their defaults)
//! - from the environment with [`ClientConfig::from_env`]
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `JSONAPI_BASE_URL` | `base_url` | `http://localhost:8080` |
//! | `JSONAPI_TIMEOUT_SECS` | `timeout_secs` | `30` |
//! | `JSONAPI_INCLUDE_POLICY` | `include_policy` (`stub` / `strict`) | `stub` |
//! | `JSONAPI_PAGE_SIZE` | `page_size` | unset |

use jsonapi_core::IncludePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "JSONAPI_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "JSONAPI_TIMEOUT_SECS";
pub const ENV_INCLUDE_POLICY: &str = "JSONAPI_INCLUDE_POLICY";
pub const ENV_PAGE_SIZE: &str = "JSONAPI_PAGE_SIZE";

/// A configuration value could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Settings shared by every collection of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for relative request paths.
    pub base_url: String,
    pub timeout_secs: u64,
    pub include_policy: IncludePolicy,
    /// Sent as `page[size]` on listings, unless the query sets one.
    pub page_size: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            include_policy: IncludePolicy::Stub,
            page_size: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn include_policy(mut self, policy: IncludePolicy) -> Self {
        self.include_policy = policy;
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reads the `JSONAPI_*` variables; unset ones keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|e| ConfigError {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
                reason: format!("{e}"),
            })?;
        }
        if let Some(raw) = lookup(ENV_INCLUDE_POLICY) {
            config.include_policy = raw.parse().map_err(|reason| ConfigError {
                key: ENV_INCLUDE_POLICY,
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            let size: u32 = raw.trim().parse().map_err(|e| ConfigError {
                key: ENV_PAGE_SIZE,
                value: raw.clone(),
                reason: format!("{e}"),
            })?;
            config.page_size = Some(size);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(env(&[
            (ENV_BASE_URL, "https://api.example.com/v1/"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_INCLUDE_POLICY, "Strict"),
            (ENV_PAGE_SIZE, "50"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com/v1/");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.include_policy, IncludePolicy::Strict);
        assert_eq!(config.page_size, Some(50));
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = ClientConfig::from_lookup(env(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert_eq!(err.key, ENV_TIMEOUT_SECS);

        let err = ClientConfig::from_lookup(env(&[(ENV_INCLUDE_POLICY, "lenient")])).unwrap_err();
        assert_eq!(err.key, ENV_INCLUDE_POLICY);
        assert!(err.to_string().contains("lenient"));
    }

    #[test]
    fn deserializes_with_partial_keys() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://api", "include_policy": "strict"}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://api");
        assert_eq!(config.include_policy, IncludePolicy::Strict);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.page_size, None);
    }

    #[test]
    fn setters_chain() {
        let config = ClientConfig::new("http://api")
            .timeout_secs(3)
            .include_policy(IncludePolicy::Strict)
            .page_size(10);
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.page_size, Some(10));
    }
}
