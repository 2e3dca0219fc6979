//! Mock Content API server for end-to-end testing.
//!
//! An in-memory server answering the OAuth token endpoint and the items and
//! packages endpoints. Unlike wiremock, which mocks single exchanges per
//! test, it keeps state across requests so whole workflows can be exercised:
//! token acquisition, token expiry and recursive association resolution.
//!
//! # Example
//!
//! ```ignore
//! use contentapi::mock_server::MockServer;
//! use contentapi::ContentApiSdk;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();
//!
//!     let package = sdk.get_package("sports-weekly", true).await.unwrap();
//!     assert_eq!(package.headline.as_deref(), Some("Sports weekly"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::{MockServer, MOCK_CLIENT_ID, MOCK_PASSWORD, MOCK_USERNAME};
pub use state::MockState;
