//! Connection settings resolved from the environment.

use std::env;

/// Default server location when `PROWLARR_URL` is not set.
pub const DEFAULT_URL: &str = "http://localhost:9696";

/// Value shipped as the API key until the operator configures a real one.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

pub const URL_VAR: &str = "PROWLARR_URL";
pub const API_KEY_VAR: &str = "PROWLARR_API_KEY";

/// Base URL and API key of the Prowlarr instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    api_key: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Config {
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Load configuration from `PROWLARR_URL` and `PROWLARR_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or blank URL
    /// falls back to [`DEFAULT_URL`], an unset key to the placeholder.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let api_key = lookup(API_KEY_VAR).unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string());
        Self::new(base_url.trim(), api_key.trim())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns a copy of this config using `api_key` instead.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Config {
            base_url: self.base_url.clone(),
            api_key: api_key.into(),
        }
    }

    /// Whether the key still needs to be provided by the operator.
    pub fn has_placeholder_key(&self) -> bool {
        let key = self.api_key.trim();
        key.is_empty() || key.eq_ignore_ascii_case(PLACEHOLDER_API_KEY)
    }
}
