//! Access token acquisition.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{ContentApiError, Result};
use crate::transport::{ReqwestTransport, DEFAULT_TIMEOUT_SECS};

/// Path of the OAuth token endpoint, relative to the API base URL.
pub const OAUTH_TOKEN_PATH: &str = "/oauth/token";

/// Obtains and caches the access token used to authenticate API calls.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// The cached access token, if one has been obtained.
    fn access_token(&self) -> Option<&str>;

    /// Base URL the token endpoint lives under.
    fn set_base_url(&mut self, base_url: &str);

    /// Request a fresh token, replacing any cached one.
    ///
    /// # Errors
    ///
    /// Returns [`ContentApiError::Authentication`] if no token could be obtained.
    async fn fetch_tokens(&mut self) -> Result<()>;
}

/// OAuth2 resource owner password grant.
#[derive(Clone)]
pub struct OAuthPasswordAuthenticator {
    http: Client,
    timeout: Duration,
    client_id: String,
    username: String,
    password: String,
    base_url: Option<String>,
    access_token: Option<String>,
}

impl std::fmt::Debug for OAuthPasswordAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthPasswordAuthenticator")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

impl OAuthPasswordAuthenticator {
    pub fn new(
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http: ReqwestTransport::builder().build().unwrap_or_default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client_id: client_id.into(),
            username: username.into(),
            password: password.into(),
            base_url: None,
            access_token: None,
        }
    }

    /// Send token requests through `http`, typically the client shared with
    /// the API transport.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Timeout applied to each token request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

#[async_trait]
impl Authenticator for OAuthPasswordAuthenticator {
    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn set_base_url(&mut self, base_url: &str) {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
    }

    #[tracing::instrument(skip(self), fields(client_id = %self.client_id))]
    async fn fetch_tokens(&mut self) -> Result<()> {
        let base_url = self.base_url.as_deref().ok_or_else(|| {
            ContentApiError::Authentication("no base url set for the token endpoint".to_string())
        })?;
        let url = format!("{base_url}{OAUTH_TOKEN_PATH}");

        let form = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .form(&form)
            .send()
            .await
            .map_err(|e| ContentApiError::Authentication(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentApiError::Authentication(format!(
                "token endpoint returned status {}",
                status.as_u16()
            )));
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            ContentApiError::Authentication(format!("invalid token response: {e}"))
        })?;

        match tokens.access_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!("obtained access token");
                self.access_token = Some(token);
                Ok(())
            }
            None => Err(ContentApiError::Authentication(
                "token response did not contain an access token".to_string(),
            )),
        }
    }
}
