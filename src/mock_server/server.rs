//! Mock Content API server.
//!
//! Provides an axum-based HTTP server that simulates the Content API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;
use crate::ClientConfig;

/// Credentials accepted by servers started with [`MockServer::start`].
pub const MOCK_CLIENT_ID: &str = "mock-client";
pub const MOCK_USERNAME: &str = "editor";
pub const MOCK_PASSWORD: &str = "secret";

/// A mock Content API server for testing.
///
/// The server runs in the background and can be used to test the SDK
/// against a realistic API implementation, including token issuing.
pub struct MockServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures and credentials.
    ///
    /// The server listens on a random available port and returns immediately.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with no content that accepts any credentials.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            addr,
            handle,
            state: shared_state,
        }
    }

    /// Base URL of the server, e.g. `http://127.0.0.1:38211`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Client configuration pointing at this server with the default
    /// credentials.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.addr.ip().to_string())
            .with_port(self.port())
            .with_protocol("http")
            .with_credentials(MOCK_CLIENT_ID, MOCK_USERNAME, MOCK_PASSWORD)
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
            .with_credentials(MOCK_CLIENT_ID, MOCK_USERNAME, MOCK_PASSWORD)
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for item in scenario.items {
            state.items.insert(item.id(), item);
        }

        for package in scenario.packages {
            state.packages.insert(package.id(), package);
        }

        state
    }

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route("/oauth/token", post(handlers::issue_token))
            .route("/items", get(handlers::list_items))
            .route("/items/:id", get(handlers::get_item))
            .route("/packages", get(handlers::list_packages))
            .route("/packages/:id", get(handlers::get_package))
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
