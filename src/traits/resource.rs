//! Resource trait shared by everything served from a collection endpoint.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::sdk::ContentApiSdk;

/// A resource type served from one collection endpoint.
#[async_trait]
pub trait Resource: DeserializeOwned + Send + Sized {
    /// Collection path, e.g. `/items`.
    const ENDPOINT: &'static str;

    /// Post-process a freshly decoded resource.
    ///
    /// Packages resolve their associations here when asked to; other
    /// resources are returned unchanged.
    async fn prepare(self, _sdk: &mut ContentApiSdk, _resolve_associations: bool) -> Self {
        self
    }
}
