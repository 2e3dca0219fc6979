//! Test data fixtures for the mock server.
//!
//! Factory functions for items, packages and association references, plus a
//! default scenario with nested packages.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use crate::{Association, AssociationRef, Item, Package, ENDPOINT_ITEMS, ENDPOINT_PACKAGES};

/// Host used in fixture URIs. Identifiers are taken from the path, so the
/// host does not have to match the server's address.
pub const FIXTURE_BASE_URI: &str = "http://publicapi:5050";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// URI of the resource `id` under `endpoint`.
    pub fn uri(endpoint: &str, id: &str) -> String {
        format!("{FIXTURE_BASE_URI}{endpoint}/{}", urlencoding::encode(id))
    }

    // Items

    /// Create an item with the required fields and a headline.
    pub fn minimal_item(id: &str, headline: &str) -> Item {
        Item {
            uri: Self::uri(ENDPOINT_ITEMS, id),
            version: Some("1".to_string()),
            versioncreated: Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).single(),
            headline: Some(headline.to_string()),
            byline: None,
            body_text: None,
            body_html: None,
            language: Some("en".to_string()),
            pubstatus: Some("usable".to_string()),
            urgency: None,
            item_type: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Create a text item with a body.
    pub fn text_item(id: &str, headline: &str, body: &str) -> Item {
        let mut item = Self::minimal_item(id, headline);
        item.item_type = Some("text".to_string());
        item.byline = Some("Staff reporter".to_string());
        item.body_text = Some(body.to_string());
        item.body_html = Some(format!("<p>{body}</p>"));
        item.urgency = Some(3);
        item
    }

    /// Create a picture item.
    pub fn picture_item(id: &str, headline: &str) -> Item {
        let mut item = Self::minimal_item(id, headline);
        item.item_type = Some("picture".to_string());
        item.extra.insert(
            "renditions".to_string(),
            serde_json::json!({"original": {"href": format!("{FIXTURE_BASE_URI}/assets/{id}.jpg")}}),
        );
        item
    }

    // Packages

    /// Create a package without associations.
    pub fn minimal_package(id: &str, headline: &str) -> Package {
        Package {
            uri: Self::uri(ENDPOINT_PACKAGES, id),
            version: Some("1".to_string()),
            versioncreated: Utc.with_ymd_and_hms(2024, 5, 17, 10, 0, 0).single(),
            headline: Some(headline.to_string()),
            description_text: None,
            language: Some("en".to_string()),
            package_type: Some("composite".to_string()),
            associations: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Reference to the item `id`.
    pub fn item_ref(id: &str, item_type: &str) -> Association {
        Association::Reference(AssociationRef::new(Self::uri(ENDPOINT_ITEMS, id), item_type))
    }

    /// Reference to the nested package `id`.
    pub fn package_ref(id: &str) -> Association {
        Association::Reference(AssociationRef::new(
            Self::uri(ENDPOINT_PACKAGES, id),
            crate::PACKAGE_TYPE_COMPOSITE,
        ))
    }

    /// Create a package holding the given `(group, name, reference)` entries.
    pub fn package_with_associations(
        id: &str,
        headline: &str,
        entries: Vec<(&str, &str, Association)>,
    ) -> Package {
        let mut package = Self::minimal_package(id, headline);
        let mut groups: BTreeMap<String, BTreeMap<String, Association>> = BTreeMap::new();
        for (group, name, association) in entries {
            groups
                .entry(group.to_string())
                .or_default()
                .insert(name.to_string(), association);
        }
        package.associations = Some(groups);
        package
    }

    // Scenarios

    /// Default scenario: a sports package nesting a photo gallery, plus a
    /// package with a dangling reference.
    pub fn default_scenario() -> DefaultScenario {
        let items = vec![
            Self::text_item(
                "match-report",
                "Cup final ends in extra time",
                "The final was decided in the last minute of extra time.",
            ),
            Self::text_item(
                "transfer-news",
                "Transfer window closes",
                "Clubs completed a record number of deals.",
            ),
            Self::picture_item("final-whistle", "Final whistle"),
            Self::picture_item("trophy-lift", "Captain lifts the trophy"),
            Self::text_item(
                "tag:demodata.org,0003:ninjs_XYZ123",
                "Demo item",
                "Demo data item with a tag identifier.",
            ),
        ];

        let packages = vec![
            Self::package_with_associations(
                "photo-gallery",
                "Cup final in pictures",
                vec![
                    ("main", "photo1", Self::item_ref("final-whistle", "picture")),
                    ("main", "photo2", Self::item_ref("trophy-lift", "picture")),
                ],
            ),
            Self::package_with_associations(
                "sports-weekly",
                "Sports weekly",
                vec![
                    ("main", "story", Self::item_ref("match-report", "text")),
                    ("main", "gallery", Self::package_ref("photo-gallery")),
                    ("sidebars", "transfers", Self::item_ref("transfer-news", "text")),
                ],
            ),
            Self::package_with_associations(
                "partly-published",
                "Partly published",
                vec![
                    ("main", "story", Self::item_ref("match-report", "text")),
                    ("main", "retracted", Self::item_ref("retracted-story", "text")),
                ],
            ),
            Self::minimal_package("empty-package", "Empty package"),
        ];

        DefaultScenario { items, packages }
    }
}

/// Default test scenario with related items and packages.
pub struct DefaultScenario {
    pub items: Vec<Item>,
    pub packages: Vec<Package>,
}
