/// Error types
///
/// `ApiError` travels inside iced messages, so it is `Clone` and keeps
/// only the rendered error text of the underlying HTTP failure.

use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the image listing service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The configured server URL cannot carry path segments
    #[error("server URL cannot be used as a base: {0}")]
    InvalidBaseUrl(String),

    /// Connection, timeout or body transfer failure
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// Body was not the JSON shape we expected
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

/// Failure loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid server_url {value:?}: {source}")]
    InvalidServerUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}
