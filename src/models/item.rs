//! Item model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pagination::Page;
use crate::request::RequestParameters;
use crate::sdk::{ContentApiSdk, ENDPOINT_ITEMS};
use crate::traits::{Get, List, Resource};

/// A single piece of content (text, picture, video, ...) in ninjs format.
///
/// Only the commonly used fields are typed; everything else the API sends is
/// kept in [`extra`](Item::extra).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Canonical URI of the item.
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioncreated: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubstatus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<u32>,

    /// Content type. Set from the association reference when the item was
    /// reached through a package.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,

    /// Remaining fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    /// Item identifier, derived from its URI.
    pub fn id(&self) -> String {
        ContentApiSdk::get_id_from_uri(&self.uri)
    }
}

impl Resource for Item {
    const ENDPOINT: &'static str = ENDPOINT_ITEMS;
}

#[async_trait]
impl Get for Item {
    type Id = String;

    #[tracing::instrument(skip(sdk))]
    async fn get(sdk: &mut ContentApiSdk, id: String) -> Result<Self> {
        sdk.get_item(&id).await
    }
}

#[async_trait]
impl List for Item {
    type Query = RequestParameters;

    #[tracing::instrument(skip(sdk))]
    async fn list_page(
        sdk: &mut ContentApiSdk,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        sdk.get_items(query.clone())?.page(page, count).await
    }
}
