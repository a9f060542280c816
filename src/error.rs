// src/error.rs
// =============================================================================
// Typed errors for each stage of the pipeline.
//
// The modules return these concrete types; main.rs wraps them in anyhow with
// extra context before printing.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Problems with the values given on the command line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} `{value}` must not contain '/' or whitespace")]
    InvalidName { field: &'static str, value: String },
    #[error("invalid API url `{0}`")]
    InvalidApiUrl(String),
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
}

/// Failures while talking to the GitHub API
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client")]
    Client(#[from] reqwest::Error),
    #[error("token is not a valid HTTP header value")]
    InvalidToken,
    #[error("request failed")]
    Request(#[from] reqwest_middleware::Error),
    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("not found: {url}")]
    NotFound { url: String },
    #[error("unauthorized (check the token): {url}")]
    Unauthorized { url: String },
    #[error("rate limited on {url}, gave up after waiting {waits} time(s)")]
    RateLimited { url: String, waits: u32 },
    #[error("HTTP {status} from {url}: {message}")]
    Status {
        url: String,
        status: StatusCode,
        message: String,
    },
    #[error("invalid url")]
    InvalidUrl(#[from] url::ParseError),
}

/// Failures while writing a dataset to disk
#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode MessagePack")]
    MsgPack(#[from] rmp_serde::encode::Error),
    #[error("failed to encode JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to move output into place")]
    Persist(#[from] tempfile::PersistError),
}
