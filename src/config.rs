//! Environment-driven gateway configuration.

use crate::client::{Gateway, GatewayBuilder};
use crate::errors::GatewayError;
use crate::http::RetryPolicy;
use std::time::Duration;

/// Environment variable holding the Mapbox access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
/// Optional override of the API host, e.g. for a proxy or a mock server.
pub const BASE_URL_ENV: &str = "MAPBOX_BASE_URL";
/// Optional per-exchange timeout in whole seconds.
pub const TIMEOUT_SECS_ENV: &str = "MAPBOX_TIMEOUT_SECS";
/// Optional retry count after the first attempt.
pub const MAX_RETRIES_ENV: &str = "MAPBOX_MAX_RETRIES";

/// Settings read from the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub access_token: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
}

impl GatewayConfig {
    /// Reads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if `MAPBOX_ACCESS_TOKEN` is
    /// missing or a numeric variable does not parse.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ACCESS_TOKEN_ENV)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::Configuration(format!("{ACCESS_TOKEN_ENV} is not set"))
            })?;

        let base_url = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty());
        let timeout = parse_var::<u64>(&lookup, TIMEOUT_SECS_ENV)?.map(Duration::from_secs);
        let max_retries = parse_var::<u32>(&lookup, MAX_RETRIES_ENV)?;

        Ok(Self {
            access_token,
            base_url,
            timeout,
            max_retries,
        })
    }

    /// Applies these settings to a fresh [`GatewayBuilder`].
    #[must_use]
    pub fn builder(self) -> GatewayBuilder {
        let mut builder = Gateway::builder(self.access_token);
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            builder = builder.retry_policy(RetryPolicy::default().with_max_retries(max_retries));
        }
        builder
    }

    /// Builds a [`Gateway`] from these settings.
    ///
    /// # Errors
    ///
    /// See [`GatewayBuilder::build`].
    pub fn into_gateway(self) -> Result<Gateway, GatewayError> {
        self.builder().build()
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, GatewayError> {
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                GatewayError::Configuration(format!(
                    "{key} must be a non-negative integer, got {raw:?}"
                ))
            })
        })
        .transpose()
}
