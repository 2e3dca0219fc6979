//! Request model and request decoration.
//!
//! A [`Request`] describes one logical call against the Content API: where it
//! goes, which query parameters it carries, plus optional headers and
//! transport options. Anything implementing [`ApiRequest`] can be dispatched
//! by the [`ApiClient`](crate::ApiClient).
//!
//! Decorators wrap another [`ApiRequest`] and forward every accessor unless
//! they override it. [`OAuthDecorator`] overrides the headers to attach the
//! access token, leaving the wrapped request untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ContentApiError, Result};

/// Protocol used when a request does not specify one.
pub const DEFAULT_PROTOCOL: &str = "https";

/// Default number of results per page.
pub const DEFAULT_MAX_RESULTS: u32 = 25;

/// Header name carrying the access token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Request headers, keyed by header name.
pub type Headers = BTreeMap<String, String>;

/// Transport options. Opaque to the request layer; the transport decides
/// which keys it understands.
pub type Options = BTreeMap<String, serde_json::Value>;

/// Query parameters for listing calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParameters {
    /// Free text query.
    #[serde(rename = "q", default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of results per page.
    pub max_results: u32,
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self {
            query: None,
            page: 1,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Point the parameters at the page containing `offset`, `length` results wide.
    ///
    /// # Errors
    ///
    /// Returns [`ContentApiError::InvalidArgument`] when `length` is zero.
    pub fn set_offset_and_length(&mut self, offset: u32, length: u32) -> Result<()> {
        if length == 0 {
            return Err(ContentApiError::InvalidArgument(
                "length must be greater than zero".to_string(),
            ));
        }
        self.page = offset / length + 1;
        self.max_results = length;
        Ok(())
    }

    /// Encode as a query string: `q`, then `page`, then `max_results`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(query) = &self.query {
            serializer.append_pair("q", query);
        }
        serializer
            .append_pair("page", &self.page.to_string())
            .append_pair("max_results", &self.max_results.to_string());
        serializer.finish()
    }
}

/// Read contract shared by requests and request decorators.
pub trait ApiRequest: Send + Sync {
    fn host(&self) -> &str;

    fn port(&self) -> Option<u16>;

    /// Protocol, `https` unless configured otherwise.
    fn protocol(&self) -> &str;

    fn uri(&self) -> &str;

    fn parameters(&self) -> &RequestParameters;

    fn headers(&self) -> &Headers;

    fn options(&self) -> &Options;

    /// `protocol://host[:port]`
    fn base_url(&self) -> String {
        match self.port() {
            Some(port) => format!("{}://{}:{}", self.protocol(), self.host(), port),
            None => format!("{}://{}", self.protocol(), self.host()),
        }
    }

    /// Base URL, path and encoded query parameters.
    fn full_url(&self) -> String {
        format!(
            "{}{}?{}",
            self.base_url(),
            self.uri(),
            self.parameters().to_query_string()
        )
    }
}

impl<T: ApiRequest + ?Sized> ApiRequest for &T {
    fn host(&self) -> &str {
        (**self).host()
    }

    fn port(&self) -> Option<u16> {
        (**self).port()
    }

    fn protocol(&self) -> &str {
        (**self).protocol()
    }

    fn uri(&self) -> &str {
        (**self).uri()
    }

    fn parameters(&self) -> &RequestParameters {
        (**self).parameters()
    }

    fn headers(&self) -> &Headers {
        (**self).headers()
    }

    fn options(&self) -> &Options {
        (**self).options()
    }

    fn base_url(&self) -> String {
        (**self).base_url()
    }

    fn full_url(&self) -> String {
        (**self).full_url()
    }
}

/// A request against the Content API.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    host: String,
    port: Option<u16>,
    protocol: String,
    uri: String,
    parameters: RequestParameters,
    headers: Headers,
    options: Options,
}

impl Request {
    /// Create a request.
    ///
    /// # Errors
    ///
    /// Returns [`ContentApiError::InvalidArgument`] if `host` or `uri` is empty.
    pub fn new(
        host: &str,
        uri: &str,
        parameters: Option<RequestParameters>,
        port: Option<u16>,
        protocol: Option<&str>,
    ) -> Result<Self> {
        if host.trim().is_empty() {
            return Err(ContentApiError::InvalidArgument(
                "request host is required".to_string(),
            ));
        }
        if uri.trim().is_empty() {
            return Err(ContentApiError::InvalidArgument(
                "request uri is required".to_string(),
            ));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            protocol: protocol
                .filter(|p| !p.is_empty())
                .unwrap_or(DEFAULT_PROTOCOL)
                .to_string(),
            uri: uri.to_string(),
            parameters: parameters.unwrap_or_default(),
            headers: Headers::new(),
            options: Options::new(),
        })
    }

    /// Replace all headers.
    pub fn set_headers(&mut self, headers: Headers) -> &mut Self {
        self.headers = headers;
        self
    }

    /// Replace all transport options.
    pub fn set_options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    pub fn parameters_mut(&mut self) -> &mut RequestParameters {
        &mut self.parameters
    }

    /// Repurpose this request for another slice of the result set.
    pub fn set_offset_and_length(&mut self, offset: u32, length: u32) -> Result<&mut Self> {
        self.parameters.set_offset_and_length(offset, length)?;
        Ok(self)
    }
}

impl ApiRequest for Request {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> Option<u16> {
        self.port
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn parameters(&self) -> &RequestParameters {
        &self.parameters
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn options(&self) -> &Options {
        &self.options
    }
}

/// Transparent wrapper around another request.
///
/// Forwards every accessor to the wrapped request. Concrete decorators hold
/// one of these and override only what they change.
#[derive(Debug, Clone)]
pub struct RequestDecorator<R> {
    inner: R,
}

impl<R: ApiRequest> RequestDecorator<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The wrapped request.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ApiRequest> ApiRequest for RequestDecorator<R> {
    fn host(&self) -> &str {
        self.inner.host()
    }

    fn port(&self) -> Option<u16> {
        self.inner.port()
    }

    fn protocol(&self) -> &str {
        self.inner.protocol()
    }

    fn uri(&self) -> &str {
        self.inner.uri()
    }

    fn parameters(&self) -> &RequestParameters {
        self.inner.parameters()
    }

    fn headers(&self) -> &Headers {
        self.inner.headers()
    }

    fn options(&self) -> &Options {
        self.inner.options()
    }

    fn base_url(&self) -> String {
        self.inner.base_url()
    }

    fn full_url(&self) -> String {
        self.inner.full_url()
    }
}

/// Decorator that attaches an OAuth access token to a request.
///
/// The token header lives in the decorator's own header view; the wrapped
/// request keeps its original headers.
pub struct OAuthDecorator<R> {
    decorated: RequestDecorator<R>,
    access_token: Option<String>,
    headers: Option<Headers>,
}

impl<R> std::fmt::Debug for OAuthDecorator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthDecorator")
            .field("has_access_token", &self.access_token.is_some())
            .field("authenticated", &self.headers.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: ApiRequest> OAuthDecorator<R> {
    pub fn new(request: R) -> Self {
        Self {
            decorated: RequestDecorator::new(request),
            access_token: None,
            headers: None,
        }
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Merge the authorization header into the wrapped request's headers.
    ///
    /// The authorization header replaces any existing one; every other header
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ContentApiError::InvalidArgument`] when no token was set.
    pub fn add_authentication(&mut self) -> Result<&mut Self> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            ContentApiError::InvalidArgument("no access token to authenticate with".to_string())
        })?;

        let mut headers = self.decorated.headers().clone();
        headers.insert(AUTHORIZATION_HEADER.to_string(), format!("OAuth2 {token}"));
        self.headers = Some(headers);
        Ok(self)
    }
}

impl<R: ApiRequest> ApiRequest for OAuthDecorator<R> {
    fn host(&self) -> &str {
        self.decorated.host()
    }

    fn port(&self) -> Option<u16> {
        self.decorated.port()
    }

    fn protocol(&self) -> &str {
        self.decorated.protocol()
    }

    fn uri(&self) -> &str {
        self.decorated.uri()
    }

    fn parameters(&self) -> &RequestParameters {
        self.decorated.parameters()
    }

    fn headers(&self) -> &Headers {
        match &self.headers {
            Some(headers) => headers,
            None => self.decorated.headers(),
        }
    }

    fn options(&self) -> &Options {
        self.decorated.options()
    }

    fn base_url(&self) -> String {
        self.decorated.base_url()
    }

    fn full_url(&self) -> String {
        self.decorated.full_url()
    }
}
