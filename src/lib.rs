//! Superdesk Content API client library.
//!
//! A Rust library for reading items and packages from the Superdesk Content
//! API. Calls are authenticated with an OAuth access token that is fetched
//! on first use and refreshed when the API rejects it. Packages can have
//! their association references expanded into the full object graph.
//!
//! # Quick Start
//!
//! ```no_run
//! use contentapi::{ContentApiSdk, Get, Item, RequestParameters};
//!
//! #[tokio::main]
//! async fn main() -> contentapi::Result<()> {
//!     // Create the SDK from environment variables
//!     let mut sdk = ContentApiSdk::from_env()?;
//!
//!     // Get an item by identifier
//!     let item = Item::get(&mut sdk, "tag:demodata.org,0003:ninjs_XYZ123".to_string()).await?;
//!     println!("Item: {:?}", item.headline);
//!
//!     // Get a package with its associations resolved
//!     let package = sdk.get_package("tag:demodata.org,0012:ninjs_XYZ123", true).await?;
//!     println!("Package has {} associations", package.association_count());
//!
//!     // Slice through a search result
//!     let mut items = sdk.get_items(RequestParameters::new().with_query("election"))?;
//!     println!("{} matching items", items.total_results().await?);
//!     let first_ten = items.slice(0, 10).await?;
//!     println!("Fetched {}", first_ten.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Request`] describes a call; [`OAuthDecorator`] layers the access token
//!   on top of it without modifying it.
//! - [`ApiClient`] performs authenticated calls through an [`HttpTransport`],
//!   retrying with a fresh token on 401 up to a bounded number of times.
//! - [`ContentApiSdk`] exposes items and packages, and resolves package
//!   associations.
//!
//! # Configuration
//!
//! [`ClientConfig::from_env`] reads:
//!
//! - `CONTENT_API_HOST` (required), `CONTENT_API_PORT`, `CONTENT_API_PROTOCOL`
//! - `CONTENT_API_CLIENT_ID`, `CONTENT_API_USERNAME`, `CONTENT_API_PASSWORD`
//! - `CONTENT_API_RETRY_LIMIT`, `CONTENT_API_TIMEOUT_SECS`

mod auth;
mod client;
mod config;
mod error;
mod models;
mod pagination;
mod request;
mod resolver;
mod response;
mod sdk;
mod traits;
mod transport;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

#[cfg(test)]
mod testing;

// Re-export core types
pub use auth::{Authenticator, OAuthPasswordAuthenticator, OAUTH_TOKEN_PATH};
pub use client::{ApiClient, AuthSession, DEFAULT_RETRY_LIMIT};
pub use config::ClientConfig;
pub use error::{ContentApiError, Result};
pub use pagination::{Page, ResourceCollection};
pub use request::{
    ApiRequest, Headers, OAuthDecorator, Options, Request, RequestDecorator, RequestParameters,
    DEFAULT_MAX_RESULTS, DEFAULT_PROTOCOL,
};
pub use resolver::{AssociationOutcome, ResolvedAssociations};
pub use response::Response;
pub use sdk::{
    ContentApiSdk, API_VERSION, DEFAULT_MAX_ASSOCIATION_DEPTH, ENDPOINT_ITEMS, ENDPOINT_PACKAGES,
    PACKAGE_TYPE_COMPOSITE,
};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};

// Re-export traits
pub use traits::{Get, List, Resource, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{Association, AssociationRef, Associations, Item, Package, PackageListQuery};
