//! List trait for fetching collections of resources.

use async_trait::async_trait;

use crate::error::Result;
use crate::pagination::Page;
use crate::sdk::ContentApiSdk;

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List resources with pagination support.
///
/// # Example
///
/// ```ignore
/// use contentapi::{ContentApiSdk, Item, List, RequestParameters};
///
/// let mut sdk = ContentApiSdk::from_env()?;
///
/// // Fetch a single page
/// let page = Item::list_page(&mut sdk, &RequestParameters::new().with_query("sport"), 1, 10).await?;
///
/// // Fetch all pages
/// let items = Item::list_all(&mut sdk, &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// List resources matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `sdk` - The Content API SDK
    /// * `query` - Query parameters for filtering
    /// * `page` - Page number (1-indexed)
    /// * `count` - Number of resources per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        sdk: &mut ContentApiSdk,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>>;

    /// List all resources matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(sdk: &mut ContentApiSdk, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let result = Self::list_page(sdk, query, page, DEFAULT_PAGE_SIZE).await?;
            let items_count = result.items.len();
            all_items.extend(result.items);

            if !result.has_more || items_count < DEFAULT_PAGE_SIZE as usize {
                break;
            }
            page += 1;

            if page > MAX_PAGES {
                tracing::warn!(
                    "Reached pagination limit of {} pages, stopping",
                    MAX_PAGES
                );
                break;
            }
        }

        Ok(all_items)
    }
}
