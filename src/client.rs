//! Authenticated API calls.
//!
//! [`ApiClient`] performs one logical call per [`make_api_call`]: it makes
//! sure a token is available, decorates the request with it, dispatches the
//! decorated request through the transport and classifies the status. A 401
//! triggers a token refresh and another attempt, up to the session's retry
//! limit.
//!
//! Token and retry counter live in an [`AuthSession`] owned by the client.
//! Calls take `&mut self`; share a client between tasks only behind a lock.
//!
//! [`make_api_call`]: ApiClient::make_api_call

use crate::auth::Authenticator;
use crate::error::{ContentApiError, Result};
use crate::request::{ApiRequest, Headers, OAuthDecorator};
use crate::response::Response;
use crate::transport::{HttpTransport, RawResponse};

/// Consecutive authentication failures tolerated before giving up.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Authentication state of one client: the authenticator holding the token
/// and the number of consecutive 401 responses seen.
pub struct AuthSession {
    authenticator: Box<dyn Authenticator>,
    retry_attempts: u32,
    retry_limit: u32,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("has_access_token", &self.access_token().is_some())
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_limit", &self.retry_limit)
            .finish()
    }
}

impl AuthSession {
    pub fn new(authenticator: impl Authenticator + 'static, retry_limit: u32) -> Self {
        Self {
            authenticator: Box::new(authenticator),
            retry_attempts: 0,
            retry_limit,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.authenticator.access_token()
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    fn reset_retry_attempts(&mut self) {
        self.retry_attempts = 0;
    }

    fn increment_retry_attempts(&mut self) {
        self.retry_attempts = self.retry_attempts.saturating_add(1);
    }

    fn is_retry_limit_reached(&self) -> bool {
        self.retry_attempts >= self.retry_limit
    }

    /// Fetch a new token from the authenticator.
    ///
    /// Any failure is reported as access denied; it is never retried.
    async fn renew_token(&mut self, base_url: &str) -> Result<()> {
        self.authenticator.set_base_url(base_url);
        self.authenticator.fetch_tokens().await.map_err(|e| {
            tracing::error!(error = %e, "could not obtain access token");
            ContentApiError::access_denied("Could not authenticate against API.", Some(e))
        })
    }
}

/// Client performing authenticated calls against the Content API.
pub struct ApiClient {
    transport: Box<dyn HttpTransport>,
    session: AuthSession,
    default_headers: Headers,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with the default retry limit.
    pub fn new(
        transport: impl HttpTransport + 'static,
        authenticator: impl Authenticator + 'static,
    ) -> Self {
        Self::with_session(transport, AuthSession::new(authenticator, DEFAULT_RETRY_LIMIT))
    }

    /// Create a client around an existing session.
    pub fn with_session(transport: impl HttpTransport + 'static, session: AuthSession) -> Self {
        Self {
            transport: Box::new(transport),
            session,
            default_headers: Headers::from([(
                "Accept".to_string(),
                "application/json".to_string(),
            )]),
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Headers added to every call unless the request sets them itself.
    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    pub fn set_default_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers.insert(name.into(), value.into());
    }

    /// Perform an authenticated call.
    ///
    /// # Errors
    ///
    /// - [`ContentApiError::AccessDenied`] if no token could be obtained or the
    ///   retry limit was reached.
    /// - [`ContentApiError::Client`] for any other status, for transport
    ///   failures and for bodies that are not JSON.
    #[tracing::instrument(skip(self, request), fields(url = %request.full_url()))]
    pub async fn make_api_call<R: ApiRequest + ?Sized>(&mut self, request: &R) -> Result<Response> {
        if self.session.access_token().is_none() {
            self.session.renew_token(&request.base_url()).await?;
        }

        loop {
            let response = self.send_request(request).await?;
            tracing::debug!(status = response.status, "api call completed");

            match response.status {
                200 => {
                    self.session.reset_retry_attempts();
                    return Self::create_response(response);
                }
                401 => {
                    self.session.increment_retry_attempts();

                    if self.session.is_retry_limit_reached() {
                        tracing::warn!(
                            attempts = self.session.retry_attempts,
                            "authentication retry limit reached"
                        );
                        return Err(ContentApiError::access_denied(
                            "Authentication retry limit reached.",
                            None,
                        ));
                    }

                    tracing::warn!(
                        attempt = self.session.retry_attempts,
                        "access token rejected, requesting a new one"
                    );
                    self.session.renew_token(&request.base_url()).await?;
                }
                status => {
                    return Err(ContentApiError::client(
                        format!("The server returned an error with status {status}."),
                        Some(status),
                    ));
                }
            }
        }
    }

    async fn send_request<R: ApiRequest + ?Sized>(&self, request: &R) -> Result<RawResponse> {
        let token = self.session.access_token().ok_or_else(|| {
            ContentApiError::access_denied("No access token available.", None)
        })?;

        let mut authenticated = OAuthDecorator::new(request);
        authenticated.set_access_token(token);
        authenticated.add_authentication()?;

        let headers = self.add_default_headers(authenticated.headers());

        self.transport
            .send(&authenticated.full_url(), &headers, authenticated.options())
            .await
            .map_err(|e| match e {
                ContentApiError::Client { .. } => e,
                other => ContentApiError::client(format!("Request failed: {other}"), None),
            })
    }

    fn create_response(response: RawResponse) -> Result<Response> {
        Response::new(response.status, response.body, response.headers)
            .map_err(|e| ContentApiError::client(e.to_string(), None))
    }

    /// Default headers are only added for names the request does not set.
    fn add_default_headers(&self, headers: &Headers) -> Headers {
        let mut merged = headers.clone();
        for (name, value) in &self.default_headers {
            merged
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        merged
    }
}
