use crate::error::ConfigError;
use reqwest::Url;
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "API_URL";
/// Path of the ping results collection on the backend.
pub const PING_RESULTS_PATH: &str = "/api/ping-results";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Full URL of the ping results endpoint.
    pub endpoint: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// Builds a config for `base_url` with default timings.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: endpoint_url(base_url)?,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Reads `API_URL` at run time, then the value captured at build time, then
    /// falls back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = resolve_base_url(std::env::var(API_URL_ENV).ok(), option_env!("API_URL"));
        Self::new(&base_url)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn resolve_base_url(runtime: Option<String>, build_time: Option<&str>) -> String {
    runtime
        .filter(|v| !v.trim().is_empty())
        .or_else(|| build_time.filter(|v| !v.trim().is_empty()).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Appends the endpoint path to the base URL, keeping any path prefix the base has.
fn endpoint_url(base_url: &str) -> Result<Url, ConfigError> {
    let base = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{base}{PING_RESULTS_PATH}")).map_err(|e| {
        ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        }
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(base_url.to_string())),
    }
}
