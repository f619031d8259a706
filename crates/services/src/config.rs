use std::env;
use std::time::Duration;

use url::Url;

use crate::credential::Credential;
use crate::error::ConfigError;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the quiz backend.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub credential: Option<Credential>,
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Settings for `base_url` without a credential.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `base_url` is not an http(s) url.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            credential: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    /// Reads `QUIZ_API_BASE_URL`, `QUIZ_API_TOKEN` and `QUIZ_API_TIMEOUT_SECS`,
    /// after loading a `.env` file when one is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the base url is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("QUIZ_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let credential = env::var("QUIZ_API_TOKEN").ok().and_then(Credential::bearer);
        let request_timeout = env::var("QUIZ_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            credential,
            request_timeout,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_http_urls() {
        let config = ApiConfig::new("http://localhost:8080/api").unwrap();

        assert_eq!(config.base_url.path(), "/api");
        assert!(config.credential.is_none());
    }

    #[test]
    fn new_rejects_other_schemes() {
        let err = ApiConfig::new("ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(_)));

        let err = ApiConfig::new("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }
}
