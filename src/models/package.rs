//! Package model, associations and trait implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::Item;
use crate::pagination::Page;
use crate::request::RequestParameters;
use crate::sdk::{ContentApiSdk, ENDPOINT_PACKAGES, PACKAGE_TYPE_COMPOSITE};
use crate::traits::{Get, List, Resource};

/// Association groups of a package: group name to association name to entry.
pub type Associations = BTreeMap<String, BTreeMap<String, Association>>;

/// A package: a content resource grouping references to items and other
/// packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Canonical URI of the package.
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioncreated: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

    /// Grouped references, or resolved objects after association resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associations: Option<Associations>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Package {
    /// Package identifier, derived from its URI.
    pub fn id(&self) -> String {
        ContentApiSdk::get_id_from_uri(&self.uri)
    }

    /// Number of association entries across all groups.
    pub fn association_count(&self) -> usize {
        self.associations
            .as_ref()
            .map(|groups| groups.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }
}

/// A shallow reference to another item or package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRef {
    pub uri: String,
    #[serde(rename = "type")]
    pub ref_type: String,
}

impl AssociationRef {
    pub fn new(uri: impl Into<String>, ref_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ref_type: ref_type.into(),
        }
    }

    /// Whether the reference points at another package.
    pub fn is_composite(&self) -> bool {
        self.ref_type == PACKAGE_TYPE_COMPOSITE
    }
}

/// One entry of an association group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Association {
    /// Unresolved `{uri, type}` reference, as sent by the API.
    Reference(AssociationRef),
    /// Fetched item.
    Item(Item),
    /// Fetched package, with its own associations resolved.
    Package(Box<Package>),
}

impl Association {
    pub fn as_reference(&self) -> Option<&AssociationRef> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// The `{uri, type}` pair this entry is resolved from. Embedded items
    /// carry their own type; embedded packages are always composite.
    pub fn reference(&self) -> AssociationRef {
        match self {
            Self::Reference(reference) => reference.clone(),
            Self::Item(item) => {
                AssociationRef::new(&item.uri, item.item_type.clone().unwrap_or_default())
            }
            Self::Package(package) => AssociationRef::new(&package.uri, PACKAGE_TYPE_COMPOSITE),
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            Self::Reference(reference) => &reference.uri,
            Self::Item(item) => &item.uri,
            Self::Package(package) => &package.uri,
        }
    }
}

impl<'de> Deserialize<'de> for Association {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        let object = value
            .as_object()
            .ok_or_else(|| D::Error::custom("association must be an object"))?;

        let is_reference = object.contains_key("uri")
            && object.contains_key("type")
            && object.keys().all(|k| k == "uri" || k == "type");
        let is_package = object.contains_key("associations")
            || object.get("type").and_then(Value::as_str) == Some(PACKAGE_TYPE_COMPOSITE);

        let association = if is_reference {
            AssociationRef::deserialize(value).map(Self::Reference)
        } else if is_package {
            Package::deserialize(value).map(|p| Self::Package(Box::new(p)))
        } else {
            Item::deserialize(value).map(Self::Item)
        };
        association.map_err(D::Error::custom)
    }
}

/// Query parameters for listing packages.
#[derive(Debug, Clone, Default)]
pub struct PackageListQuery {
    pub parameters: RequestParameters,
    /// Replace association references with the fetched objects.
    pub resolve_associations: bool,
}

#[async_trait]
impl Resource for Package {
    const ENDPOINT: &'static str = ENDPOINT_PACKAGES;

    async fn prepare(self, sdk: &mut ContentApiSdk, resolve_associations: bool) -> Self {
        if resolve_associations {
            sdk.resolve_associations(self).await
        } else {
            self
        }
    }
}

#[async_trait]
impl Get for Package {
    type Id = String;

    #[tracing::instrument(skip(sdk))]
    async fn get(sdk: &mut ContentApiSdk, id: String) -> Result<Self> {
        sdk.get_package(&id, false).await
    }
}

#[async_trait]
impl List for Package {
    type Query = PackageListQuery;

    #[tracing::instrument(skip(sdk))]
    async fn list_page(
        sdk: &mut ContentApiSdk,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>> {
        sdk.get_packages(query.parameters.clone(), query.resolve_associations)?
            .page(page, count)
            .await
    }
}
