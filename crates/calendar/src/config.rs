use eyre::{Result, WrapErr, eyre};
use std::{env, time::Duration};

/// Connection settings for an external calendar service.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// Base URL of the service, without a trailing slash
    pub base_url: String,
    /// Bearer token sent with every request (optional)
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl CalendarConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
            timeout_seconds: 10,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `CALENDAR_API_URL` is not set, meaning no
    /// external calendar is in use.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(base_url) = env::var("CALENDAR_API_URL") else {
            return Ok(None);
        };
        if base_url.trim().is_empty() {
            return Err(eyre!("CALENDAR_API_URL is set but empty"));
        }

        let api_token = env::var("CALENDAR_API_TOKEN").ok().filter(|t| !t.is_empty());

        let timeout_seconds = env::var("CALENDAR_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .wrap_err("Invalid CALENDAR_TIMEOUT_SECONDS value")?;

        Ok(Some(Self {
            api_token,
            timeout_seconds,
            ..Self::new(base_url)
        }))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
