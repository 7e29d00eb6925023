//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into views and the API
//! client. Nothing below the binaries reads environment variables, which keeps request
//! handling and tests independent of process-wide state.

use crate::constants::{DEBOUNCE_QUIET_PERIOD, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::{CoreError, CoreResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    debounce_quiet_period: Duration,
    request_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The base URL must be an `http://` or `https://` URL; a trailing slash is dropped so
    /// endpoint paths can be appended verbatim.
    pub fn new(
        api_base_url: impl Into<String>,
        debounce_quiet_period: Duration,
        request_timeout: Duration,
    ) -> CoreResult<Self> {
        let api_base_url = api_base_url.into().trim().trim_end_matches('/').to_string();
        if api_base_url.is_empty() {
            return Err(CoreError::InvalidInput(
                "api base url cannot be empty".into(),
            ));
        }
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(CoreError::InvalidInput(format!(
                "api base url must start with http:// or https://: {api_base_url}"
            )));
        }
        if request_timeout.is_zero() {
            return Err(CoreError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            debounce_quiet_period,
            request_timeout,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Joins an endpoint path (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    pub fn debounce_quiet_period(&self) -> Duration {
        self.debounce_quiet_period
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            debounce_quiet_period: DEBOUNCE_QUIET_PERIOD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the API base URL from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_API_URL`].
pub fn api_base_url_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Parse the debounce quiet period (milliseconds) from an optional environment value.
pub fn debounce_from_env_value(value: Option<String>) -> CoreResult<Duration> {
    match non_blank(value) {
        None => Ok(DEBOUNCE_QUIET_PERIOD),
        Some(v) => v
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| CoreError::InvalidInput(format!("invalid debounce milliseconds: {v}"))),
    }
}

/// Parse the request timeout (seconds) from an optional environment value.
pub fn request_timeout_from_env_value(value: Option<String>) -> CoreResult<Duration> {
    match non_blank(value) {
        None => Ok(DEFAULT_REQUEST_TIMEOUT),
        Some(v) => v
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| CoreError::InvalidInput(format!("invalid timeout seconds: {v}"))),
    }
}

/// Resolve a full [`CoreConfig`] from the three raw environment values.
pub fn core_config_from_env_values(
    api_url: Option<String>,
    debounce_ms: Option<String>,
    timeout_secs: Option<String>,
) -> CoreResult<CoreConfig> {
    CoreConfig::new(
        api_base_url_from_env_value(api_url),
        debounce_from_env_value(debounce_ms)?,
        request_timeout_from_env_value(timeout_secs)?,
    )
}
