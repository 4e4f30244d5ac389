//! Process-wide configuration.
//!
//! Loaded once at startup and shared read-only afterwards. Nothing mutates a
//! `Settings` after construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::Service;
use crate::http::RetryPolicy;

pub const DEFAULT_WEATHER_API_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_OPEN_NOTIFY_BASE_URL: &str = "http://api.open-notify.org";

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the fetch tools.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// weatherapi.com key. `None` means requests go out without one.
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub open_notify_base_url: String,
    pub retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_API_BASE_URL.to_string(),
            open_notify_base_url: DEFAULT_OPEN_NOTIFY_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field(
                "weather_api_key",
                &self.weather_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("weather_base_url", &self.weather_base_url)
            .field("open_notify_base_url", &self.open_notify_base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `WEATHER_API_KEY` | unset |
    /// | `WEATHER_API_BASE_URL` | `https://api.weatherapi.com/v1` |
    /// | `OPEN_NOTIFY_BASE_URL` | `http://api.open-notify.org` |
    /// | `FETCH_MAX_ATTEMPTS` | `3` |
    /// | `FETCH_TIMEOUT_SECS` | `5` |
    /// | `FETCH_RETRY_DELAY_SECS` | `2` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = RetryPolicy::default();

        let max_attempts = match get("FETCH_MAX_ATTEMPTS") {
            Some(raw) => parse_number::<u32>("FETCH_MAX_ATTEMPTS", &raw)?,
            None => defaults.max_attempts,
        };
        let timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("FETCH_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };
        let retry_delay = match get("FETCH_RETRY_DELAY_SECS") {
            Some(raw) => Duration::from_secs(parse_number("FETCH_RETRY_DELAY_SECS", &raw)?),
            None => defaults.retry_delay,
        };

        let settings = Self {
            weather_api_key: get("WEATHER_API_KEY"),
            weather_base_url: get("WEATHER_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_API_BASE_URL.to_string()),
            open_notify_base_url: get("OPEN_NOTIFY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPEN_NOTIFY_BASE_URL.to_string()),
            retry: RetryPolicy {
                max_attempts,
                timeout,
                retry_delay,
            },
        };

        if settings.weather_api_key.is_none() {
            log::warn!("WEATHER_API_KEY is not set; weather requests will be rejected by the provider");
        }

        Ok(settings)
    }

    /// Builder method to set the weather key.
    pub fn with_weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = Some(key.into());
        self
    }

    /// Builder method to point both services at one base URL (useful for stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.weather_base_url = base_url.clone();
        self.open_notify_base_url = base_url;
        self
    }

    /// Builder method to set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self, service: Service) -> &str {
        match service {
            Service::OpenNotify => &self.open_notify_base_url,
            Service::WeatherApi => &self.weather_base_url,
        }
    }

    /// The `(param, value)` pair carrying a service's credential, if one is configured.
    pub fn credential(&self, service: Service) -> Option<(&'static str, &str)> {
        let param = service.credential_param()?;
        match service {
            Service::WeatherApi => self.weather_api_key.as_deref().map(|key| (param, key)),
            Service::OpenNotify => None,
        }
    }

    /// Join a service base URL with an endpoint path.
    pub fn resolve(&self, service: Service, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url(service).trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_number<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
