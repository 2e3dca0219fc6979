//! Client configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::client::DEFAULT_RETRY_LIMIT;
use crate::error::{ContentApiError, Result};
use crate::transport::DEFAULT_TIMEOUT_SECS;

/// Connection and credential settings for a [`ContentApiSdk`](crate::ContentApiSdk).
#[derive(Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: Option<u16>,
    /// `https` when unset.
    pub protocol: Option<String>,
    pub client_id: String,
    pub username: String,
    pub password: String,
    /// Consecutive 401 responses tolerated per call.
    pub retry_limit: u32,
    /// Default HTTP timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("protocol", &self.protocol)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("retry_limit", &self.retry_limit)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            protocol: None,
            client_id: String::new(),
            username: String::new(),
            password: String::new(),
            retry_limit: DEFAULT_RETRY_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    #[must_use]
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into();
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Read the configuration from the environment.
    ///
    /// - `CONTENT_API_HOST` (required)
    /// - `CONTENT_API_PORT`, `CONTENT_API_PROTOCOL`
    /// - `CONTENT_API_CLIENT_ID`, `CONTENT_API_USERNAME`, `CONTENT_API_PASSWORD`
    /// - `CONTENT_API_RETRY_LIMIT` (default 3)
    /// - `CONTENT_API_TIMEOUT_SECS` (default 60)
    ///
    /// # Errors
    ///
    /// Returns [`ContentApiError::ConfigMissing`] if the host is not set and
    /// [`ContentApiError::InvalidArgument`] for unparseable numbers.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("CONTENT_API_HOST").ok_or_else(|| {
            ContentApiError::ConfigMissing("CONTENT_API_HOST environment variable not set".to_string())
        })?;

        let mut config = Self::new(host);
        config.port = var("CONTENT_API_PORT")
            .map(|v| parse_number("CONTENT_API_PORT", &v))
            .transpose()?;
        config.protocol = var("CONTENT_API_PROTOCOL");
        config.client_id = var("CONTENT_API_CLIENT_ID").unwrap_or_default();
        config.username = var("CONTENT_API_USERNAME").unwrap_or_default();
        config.password = var("CONTENT_API_PASSWORD").unwrap_or_default();
        if let Some(limit) = var("CONTENT_API_RETRY_LIMIT") {
            config.retry_limit = parse_number("CONTENT_API_RETRY_LIMIT", &limit)?;
        }
        if let Some(secs) = var("CONTENT_API_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("CONTENT_API_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ContentApiError::InvalidArgument(format!("{key} must be a number, got '{value}'"))
    })
}
