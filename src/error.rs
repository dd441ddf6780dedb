//! Error types for the dashboard

/// Why a poll tick did not produce a snapshot.
///
/// All variants are handled the same way (logged, snapshot kept); the split only
/// makes the log line say what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from building the dashboard configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("API base URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Errors from starting the background poller
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to start poller runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
