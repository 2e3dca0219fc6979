//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::error::Result;
use crate::sdk::ContentApiSdk;

/// Fetch a single resource by ID.
///
/// # Example
///
/// ```ignore
/// use contentapi::{ContentApiSdk, Item, Get};
///
/// let mut sdk = ContentApiSdk::from_env()?;
/// let item = Item::get(&mut sdk, "tag:demodata.org,0003:ninjs_XYZ123".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this resource.
    type Id;

    /// Fetch the resource by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource does not exist or the request fails.
    async fn get(sdk: &mut ContentApiSdk, id: Self::Id) -> Result<Self>;
}
