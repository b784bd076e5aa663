//! Environment configuration.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use reqwest::Url;
use tracing::info;

use crate::error::ConfigError;
use crate::pagination::DEFAULT_PAGE_SIZE;

pub const API_URL_VAR: &str = "BOOKSTORE_API_URL";
pub const PAGE_SIZE_VAR: &str = "BOOKSTORE_PAGE_SIZE";
pub const TIMEOUT_VAR: &str = "BOOKSTORE_TIMEOUT_SECS";
pub const PORT_VAR: &str = "BOOKSTORE_PORT";

const DEFAULT_API_URL: &str = "http://localhost:8000/_ah/api/bookstore/v1/";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root every gateway operation path is resolved against.
    pub api_url: Url,
    pub page_size: usize,
    pub timeout: Duration,
    /// Port the reference gateway listens on.
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let page_size: usize = try_load(&lookup, PAGE_SIZE_VAR, &DEFAULT_PAGE_SIZE.to_string())?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: PAGE_SIZE_VAR,
                message: "page size must be positive".to_string(),
            });
        }

        let mut api_url: Url = try_load(&lookup, API_URL_VAR, DEFAULT_API_URL)?;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            api_url,
            page_size,
            timeout: Duration::from_secs(try_load(&lookup, TIMEOUT_VAR, "30")?),
            port: try_load(&lookup, PORT_VAR, "8000")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_api_url_gets_trailing_slash() {
        let config = config_from(&[(API_URL_VAR, "https://books.example/api/v1")]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://books.example/api/v1/");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[(PAGE_SIZE_VAR, "0")]),
            Err(ConfigError::Invalid { key: PAGE_SIZE_VAR, .. })
        ));
        assert!(matches!(
            config_from(&[(PORT_VAR, "http")]),
            Err(ConfigError::Invalid { key: PORT_VAR, .. })
        ));
        assert!(config_from(&[(API_URL_VAR, "not a url")]).is_err());
    }
}
