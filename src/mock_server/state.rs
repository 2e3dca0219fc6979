//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Content API server.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Item, Package};

/// Credentials accepted by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub username: String,
    pub password: String,
}

/// Shared state for the mock server.
///
/// Holds the content served by the server and the token bookkeeping. It's
/// wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Items indexed by identifier.
    pub items: BTreeMap<String, Item>,

    /// Packages indexed by identifier.
    pub packages: BTreeMap<String, Package>,

    /// If set, the token endpoint only accepts these credentials.
    pub credentials: Option<Credentials>,

    /// Number of tokens issued so far. The current token is the last one.
    pub issued_tokens: u32,

    /// Requests seen by the token endpoint, successful or not.
    pub token_requests: u32,

    /// Requests seen by the content endpoints.
    pub content_requests: u32,

    /// Upcoming content requests to answer with 401 regardless of the token.
    pub reject_next: u32,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an item to the state.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.insert(item.id(), item);
        self
    }

    /// Add a package to the state.
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.insert(package.id(), package);
        self
    }

    /// Only issue tokens for these credentials.
    pub fn with_credentials(mut self, client_id: &str, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials {
            client_id: client_id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Answer the next `count` content requests with 401.
    pub fn reject_next_requests(&mut self, count: u32) {
        self.reject_next = count;
    }

    /// Whether the token endpoint accepts the given credentials.
    pub fn accepts(&self, client_id: &str, username: &str, password: &str) -> bool {
        self.credentials.as_ref().map_or(true, |c| {
            c.client_id == client_id && c.username == username && c.password == password
        })
    }

    /// Issue a new token, invalidating the previous one.
    pub fn issue_token(&mut self) -> String {
        self.issued_tokens += 1;
        format!("mock-token-{}", self.issued_tokens)
    }

    /// The token content requests must present, if any was issued.
    pub fn current_token(&self) -> Option<String> {
        (self.issued_tokens > 0).then(|| format!("mock-token-{}", self.issued_tokens))
    }

    /// Get an item by identifier.
    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Get a package by identifier.
    pub fn get_package(&self, id: &str) -> Option<&Package> {
        self.packages.get(id)
    }

    /// List items, optionally filtered by a free text query.
    pub fn list_items(&self, query: Option<&str>) -> Vec<&Item> {
        self.items
            .values()
            .filter(|i| {
                matches_query(query, &[i.headline.as_deref(), i.body_text.as_deref()])
            })
            .collect()
    }

    /// List packages, optionally filtered by a free text query.
    pub fn list_packages(&self, query: Option<&str>) -> Vec<&Package> {
        self.packages
            .values()
            .filter(|p| {
                matches_query(query, &[p.headline.as_deref(), p.description_text.as_deref()])
            })
            .collect()
    }
}

fn matches_query(query: Option<&str>, fields: &[Option<&str>]) -> bool {
    let Some(query) = query.map(str::to_lowercase) else {
        return true;
    };
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
}
