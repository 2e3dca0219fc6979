//! High-level entry point for the Content API.

use crate::auth::OAuthPasswordAuthenticator;
use crate::client::{ApiClient, AuthSession};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{Item, Package};
use crate::pagination::ResourceCollection;
use crate::request::{ApiRequest, Request, RequestParameters};
use crate::resolver::{self, ResolvedAssociations};
use crate::response::Response;
use crate::traits::Resource;
use crate::transport::ReqwestTransport;

/// Items endpoint.
pub const ENDPOINT_ITEMS: &str = "/items";

/// Packages endpoint.
pub const ENDPOINT_PACKAGES: &str = "/packages";

/// Association type denoting a nested package.
pub const PACKAGE_TYPE_COMPOSITE: &str = "composite";

/// API version supported by this SDK.
pub const API_VERSION: u32 = 1;

/// Default limit on nested composite associations.
pub const DEFAULT_MAX_ASSOCIATION_DEPTH: usize = 16;

/// Content API SDK.
///
/// Builds requests for the items and packages endpoints, performs them
/// through an [`ApiClient`] and turns the responses into models.
///
/// # Example
///
/// ```no_run
/// use contentapi::ContentApiSdk;
///
/// # async fn example() -> contentapi::Result<()> {
/// let mut sdk = ContentApiSdk::from_env()?;
/// let package = sdk.get_package("tag:demodata.org,0012:ninjs_XYZ123", true).await?;
/// println!("{} associations", package.association_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ContentApiSdk {
    client: ApiClient,
    host: String,
    port: Option<u16>,
    protocol: Option<String>,
    max_association_depth: usize,
}

impl ContentApiSdk {
    pub fn new(client: ApiClient, host: &str, port: Option<u16>, protocol: Option<&str>) -> Self {
        Self {
            client,
            host: host.to_string(),
            port,
            protocol: protocol.map(str::to_string),
            max_association_depth: DEFAULT_MAX_ASSOCIATION_DEPTH,
        }
    }

    /// Create an SDK talking to the API described by `config`, using the
    /// reqwest transport and the OAuth password grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(config.timeout)?;
        let authenticator = OAuthPasswordAuthenticator::new(
            &config.client_id,
            &config.username,
            &config.password,
        )
        .with_http_client(transport.http_client().clone())
        .with_timeout(config.timeout);
        let client = ApiClient::with_session(
            transport,
            AuthSession::new(authenticator, config.retry_limit),
        );

        Ok(Self::new(
            client,
            &config.host,
            config.port,
            config.protocol.as_deref(),
        ))
    }

    /// Create an SDK from `CONTENT_API_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `CONTENT_API_HOST` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    #[must_use]
    pub fn with_max_association_depth(mut self, depth: usize) -> Self {
        self.max_association_depth = depth;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn max_association_depth(&self) -> usize {
        self.max_association_depth
    }

    /// Build a request for `uri` against the configured host.
    ///
    /// # Errors
    ///
    /// Returns [`ContentApiError::InvalidArgument`](crate::ContentApiError::InvalidArgument)
    /// if no host is configured.
    pub fn new_request(&self, uri: &str, parameters: Option<RequestParameters>) -> Result<Request> {
        Request::new(
            &self.host,
            uri,
            parameters,
            self.port,
            self.protocol.as_deref(),
        )
    }

    /// Perform an authenticated call with the underlying client.
    pub async fn make_api_call<R: ApiRequest + ?Sized>(&mut self, request: &R) -> Result<Response> {
        self.client.make_api_call(request).await
    }

    /// Get a single item by identifier.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&mut self, item_id: &str) -> Result<Item> {
        let request = self.new_request(&resource_path(Item::ENDPOINT, item_id), None)?;
        let response = self.client.make_api_call(&request).await?;
        response.decode()
    }

    /// Items matching `parameters`, as a sliceable collection.
    pub fn get_items(
        &mut self,
        parameters: RequestParameters,
    ) -> Result<ResourceCollection<'_, Item>> {
        let request = self.new_request(Item::ENDPOINT, Some(parameters))?;
        Ok(ResourceCollection::new(self, request, false))
    }

    /// Get a package by identifier.
    ///
    /// With `resolve_associations`, association references are replaced by
    /// the fetched items and packages, recursively.
    #[tracing::instrument(skip(self))]
    pub async fn get_package(&mut self, package_id: &str, resolve_associations: bool) -> Result<Package> {
        let package = self.fetch_package(package_id).await?;

        if resolve_associations {
            Ok(self.resolve_associations(package).await)
        } else {
            Ok(package)
        }
    }

    /// Packages matching `parameters`, as a sliceable collection.
    pub fn get_packages(
        &mut self,
        parameters: RequestParameters,
        resolve_associations: bool,
    ) -> Result<ResourceCollection<'_, Package>> {
        let request = self.new_request(Package::ENDPOINT, Some(parameters))?;
        Ok(ResourceCollection::new(self, request, resolve_associations))
    }

    /// Fetch every association of `package`, recording per entry whether it
    /// could be resolved.
    pub async fn get_associations_from_package(&mut self, package: &Package) -> ResolvedAssociations {
        resolver::collect_associations(self, package, 0).await
    }

    /// Replace the package's associations with the resolved ones.
    ///
    /// Leaves the package untouched when it has no associations or when
    /// nothing could be resolved.
    pub fn inject_associations(package: Package, associations: ResolvedAssociations) -> Package {
        resolver::inject_associations(package, associations)
    }

    /// Resolve the associations of an already fetched package.
    pub async fn resolve_associations(&mut self, package: Package) -> Package {
        resolver::resolve_package(self, package, 0).await
    }

    pub(crate) async fn fetch_package(&mut self, package_id: &str) -> Result<Package> {
        let request = self.new_request(&resource_path(Package::ENDPOINT, package_id), None)?;
        let response = self.client.make_api_call(&request).await?;
        response.decode()
    }

    /// Extract the identifier from an item or package URI.
    ///
    /// Works for both
    /// `http://publicapi:5050/packages/tag%3Ademodata.org%2C0012%3Aninjs_XYZ123`
    /// and `http://publicapi:5050/items/tag%3Ademodata.org%2C0003%3Aninjs_XYZ123`;
    /// the identifier is returned URL-decoded.
    pub fn get_id_from_uri(uri: &str) -> String {
        let path = match url::Url::parse(uri) {
            Ok(url) => url.path().to_string(),
            Err(_) => uri.split(['?', '#']).next().unwrap_or_default().to_string(),
        };

        let id = Self::available_endpoints()
            .iter()
            .find_map(|endpoint| {
                let prefix = format!("{endpoint}/");
                path.find(&prefix).map(|pos| &path[pos + prefix.len()..])
            })
            .unwrap_or(path.as_str());

        let id = id.trim_matches(|c| c == '/' || c == ' ');
        match urlencoding::decode(id) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => id.to_string(),
        }
    }

    /// Every endpoint supported by this SDK.
    pub fn available_endpoints() -> [&'static str; 2] {
        [ENDPOINT_ITEMS, ENDPOINT_PACKAGES]
    }

    /// Version segment for versioned URLs, e.g. `v1`.
    pub fn version_url() -> String {
        format!("v{API_VERSION}")
    }
}

fn resource_path(endpoint: &str, id: &str) -> String {
    format!("{}/{}", endpoint, urlencoding::encode(id))
}
