//! Pagination over Content API result sets.

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;
use crate::sdk::ContentApiSdk;
use crate::traits::Resource;

/// A page of results from the Content API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages (if known).
    pub total: Option<u64>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub count: u32,
    /// Whether there are more pages.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, count: u32, total: Option<u64>) -> Self {
        let has_more = match total {
            Some(t) => (u64::from(page) * u64::from(count)) < t,
            None => items.len() >= count as usize,
        };
        Self {
            items,
            total,
            page,
            count,
            has_more,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            count: self.count,
            has_more: self.has_more,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Result set exposed as a sliceable collection.
///
/// Owns one [`Request`] and repurposes it for every slice, re-issuing the
/// call through the SDK's [`ApiClient`](crate::ApiClient).
pub struct ResourceCollection<'a, T> {
    sdk: &'a mut ContentApiSdk,
    request: Request,
    resolve_associations: bool,
    _resource: PhantomData<fn() -> T>,
}

impl<'a, T: Resource> ResourceCollection<'a, T> {
    pub(crate) fn new(sdk: &'a mut ContentApiSdk, request: Request, resolve_associations: bool) -> Self {
        Self {
            sdk,
            request,
            resolve_associations,
            _resource: PhantomData,
        }
    }

    /// The request backing this collection.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Total number of resources matching the request.
    pub async fn total_results(&mut self) -> Result<u64> {
        let response = self.sdk.make_api_call(&self.request).await?;
        Ok(response.total_results())
    }

    /// Fetch `length` resources starting at `offset`.
    ///
    /// The API pages in multiples of `length`, so an offset that is not a
    /// multiple of it is served from the two pages covering the range.
    pub async fn slice(&mut self, offset: u32, length: u32) -> Result<Vec<T>> {
        self.request.set_offset_and_length(offset, length)?;
        let skip = offset % length;
        let response = self.sdk.make_api_call(&self.request).await?;
        let mut decoded = Self::decode_resources(&response)?;

        if skip > 0 && decoded.len() >= length as usize {
            let next_offset = (offset - skip).saturating_add(length);
            self.request.set_offset_and_length(next_offset, length)?;
            let response = self.sdk.make_api_call(&self.request).await?;
            decoded.extend(Self::decode_resources(&response)?);
        }

        let kept = decoded
            .into_iter()
            .skip(skip as usize)
            .take(length as usize)
            .collect();
        Ok(self.prepare(kept).await)
    }

    /// Fetch one page of `count` resources.
    pub async fn page(&mut self, page: u32, count: u32) -> Result<Page<T>> {
        let page = page.max(1);
        self.request.set_offset_and_length((page - 1).saturating_mul(count), count)?;
        let response = self.sdk.make_api_call(&self.request).await?;
        let items = self.decode(&response).await?;
        Ok(Page::new(items, page, count, Some(response.total_results())))
    }

    async fn decode(&mut self, response: &Response) -> Result<Vec<T>> {
        let decoded = Self::decode_resources(response)?;
        Ok(self.prepare(decoded).await)
    }

    fn decode_resources(response: &Response) -> Result<Vec<T>> {
        Ok(match response.resources() {
            Value::Array(_) => response.decode()?,
            _ => vec![response.decode()?],
        })
    }

    async fn prepare(&mut self, decoded: Vec<T>) -> Vec<T> {
        let mut resources = Vec::with_capacity(decoded.len());
        for resource in decoded {
            resources.push(resource.prepare(self.sdk, self.resolve_associations).await);
        }
        resources
    }
}
