//! HTTP transport used by the [`ApiClient`](crate::ApiClient).
//!
//! The client never talks to the network itself; it hands a URL, headers and
//! options to an [`HttpTransport`] and classifies whatever comes back.
//! [`ReqwestTransport`] is the default implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ContentApiError, Result};
use crate::request::{Headers, Options};

const USER_AGENT: &str = concat!("contentapi/", env!("CARGO_PKG_VERSION"));

/// Timeout applied when neither the transport nor the request sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Raw HTTP response handed back by a transport.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub headers: Headers,
}

/// Performs HTTP round trips.
///
/// Implementations return every HTTP status as data; only failures to
/// complete the round trip are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, url: &str, headers: &Headers, options: &Options) -> Result<RawResponse>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
///
/// Understands two options: `timeout` (seconds) and `verify` (`false`
/// disables TLS certificate verification for that request).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with a default per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Self::builder().build().map_err(ContentApiError::Http)?;

        Ok(Self { http, timeout })
    }

    /// The shared reqwest client.
    pub fn http_client(&self) -> &Client {
        &self.http
    }

    /// Default request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn builder() -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
    }

    fn client_for(&self, options: &Options) -> Result<Client> {
        let verify = options
            .get("verify")
            .map(|v| !matches!(v, serde_json::Value::Bool(false)) && v.as_str() != Some("false"))
            .unwrap_or(true);
        if verify {
            return Ok(self.http.clone());
        }
        Self::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ContentApiError::Http)
    }

    fn timeout_for(&self, options: &Options) -> Duration {
        options
            .get("timeout")
            .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(self.timeout)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[tracing::instrument(skip(self, headers, options))]
    async fn send(&self, url: &str, headers: &Headers, options: &Options) -> Result<RawResponse> {
        let url = url::Url::parse(url)?;
        let mut request = self
            .client_for(options)?
            .get(url)
            .timeout(self.timeout_for(options));
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(ContentApiError::Http)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(ContentApiError::Http)?;

        tracing::debug!(status, bytes = body.len(), "received response");

        Ok(RawResponse {
            status,
            body,
            headers,
        })
    }
}
