//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by the quiz backend client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("quiz api request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("quiz api base url cannot take path segments: {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while reading configuration from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid QUIZ_API_BASE_URL value {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("QUIZ_API_BASE_URL must be an http(s) url, got {0:?}")]
    UnsupportedScheme(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

