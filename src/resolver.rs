//! Association resolution.
//!
//! Packages reference other content by `{uri, type}` pairs grouped under
//! named buckets. Resolution fetches each referenced item or package,
//! recursing into composite references, and substitutes the fetched objects.
//!
//! Each entry is resolved independently: a failed fetch is recorded against
//! that entry and left out of the substituted tree, so one bad reference
//! never fails the parent package. If nothing at all could be resolved, the
//! original references are kept.
//!
//! The reference graph is assumed to be acyclic. Nesting deeper than
//! [`ContentApiSdk::max_association_depth`] fails the offending entry with
//! [`ContentApiError::ResolutionDepthExceeded`] instead of recursing forever.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::{ContentApiError, Result};
use crate::models::{Association, AssociationRef, Associations, Package};
use crate::sdk::ContentApiSdk;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of resolving one association entry.
pub type AssociationOutcome = Result<Association>;

/// Per-entry results of resolving a package's associations, keyed like the
/// package's association groups.
#[derive(Debug, Default)]
pub struct ResolvedAssociations {
    groups: BTreeMap<String, BTreeMap<String, AssociationOutcome>>,
}

impl ResolvedAssociations {
    pub fn groups(&self) -> &BTreeMap<String, BTreeMap<String, AssociationOutcome>> {
        &self.groups
    }

    /// Outcome for one entry.
    pub fn get(&self, group: &str, name: &str) -> Option<&AssociationOutcome> {
        self.groups.get(group).and_then(|entries| entries.get(name))
    }

    pub fn resolved_count(&self) -> usize {
        self.outcomes().filter(|outcome| outcome.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes().filter(|outcome| outcome.is_err()).count()
    }

    /// `(group, name, error)` for every entry that could not be resolved.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str, &ContentApiError)> {
        self.groups.iter().flat_map(|(group, entries)| {
            entries.iter().filter_map(move |(name, outcome)| {
                outcome
                    .as_ref()
                    .err()
                    .map(|err| (group.as_str(), name.as_str(), err))
            })
        })
    }

    /// Association tree holding only the resolved entries. Groups keep their
    /// place even when all of their entries failed.
    pub fn into_associations(self) -> Associations {
        self.groups
            .into_iter()
            .map(|(group, entries)| {
                let resolved = entries
                    .into_iter()
                    .filter_map(|(name, outcome)| outcome.ok().map(|a| (name, a)))
                    .collect();
                (group, resolved)
            })
            .collect()
    }

    fn outcomes(&self) -> impl Iterator<Item = &AssociationOutcome> {
        self.groups.values().flat_map(BTreeMap::values)
    }

    fn record(&mut self, group: &str, name: &str, outcome: AssociationOutcome) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), outcome);
    }
}

/// Resolve the associations of `package`, which sits `depth` composite
/// levels below the package the caller asked for.
pub(crate) fn resolve_package(
    sdk: &mut ContentApiSdk,
    package: Package,
    depth: usize,
) -> BoxFuture<'_, Package> {
    Box::pin(async move {
        if package.associations.is_none() {
            return package;
        }
        let resolved = collect_associations(sdk, &package, depth).await;
        inject_associations(package, resolved)
    })
}

/// Fetch every entry of the package's association groups, including entries
/// that already carry more than a `{uri, type}` pair.
pub(crate) async fn collect_associations(
    sdk: &mut ContentApiSdk,
    package: &Package,
    depth: usize,
) -> ResolvedAssociations {
    let mut resolved = ResolvedAssociations::default();
    let Some(groups) = &package.associations else {
        return resolved;
    };

    for (group, entries) in groups {
        for (name, association) in entries {
            let outcome = resolve_reference(sdk, &association.reference(), depth).await;

            if let Err(err) = &outcome {
                tracing::warn!(
                    package = %package.uri,
                    group = %group,
                    association = %name,
                    error = %err,
                    "could not resolve association, leaving it out"
                );
            }
            resolved.record(group, name, outcome);
        }
    }

    tracing::debug!(
        package = %package.uri,
        resolved = resolved.resolved_count(),
        failed = resolved.failed_count(),
        "associations resolved"
    );
    resolved
}

async fn resolve_reference(
    sdk: &mut ContentApiSdk,
    reference: &AssociationRef,
    depth: usize,
) -> AssociationOutcome {
    let id = ContentApiSdk::get_id_from_uri(&reference.uri);

    if reference.is_composite() {
        let package = fetch_nested_package(sdk, id, depth + 1).await?;
        Ok(Association::Package(Box::new(package)))
    } else {
        let mut item = sdk.get_item(&id).await?;
        if !reference.ref_type.is_empty() {
            item.item_type = Some(reference.ref_type.clone());
        }
        Ok(Association::Item(item))
    }
}

fn fetch_nested_package(
    sdk: &mut ContentApiSdk,
    id: String,
    depth: usize,
) -> BoxFuture<'_, Result<Package>> {
    Box::pin(async move {
        let max_depth = sdk.max_association_depth();
        if depth > max_depth {
            return Err(ContentApiError::ResolutionDepthExceeded { depth: max_depth });
        }
        let package = sdk.fetch_package(&id).await?;
        Ok(resolve_package(sdk, package, depth).await)
    })
}

/// Substitute the resolved tree, unless the package had no associations to
/// begin with or none of them could be resolved.
pub(crate) fn inject_associations(mut package: Package, resolved: ResolvedAssociations) -> Package {
    if package.association_count() > 0 && resolved.resolved_count() > 0 {
        package.associations = Some(resolved.into_associations());
    }
    package
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::ApiClient;
    use crate::testing::{StubAuthenticator, StubTransport};

    fn sdk(transport: &StubTransport) -> ContentApiSdk {
        let client = ApiClient::new(transport.clone(), StubAuthenticator::new());
        ContentApiSdk::new(client, "publicapi", Some(5050), Some("http"))
    }

    fn package(value: serde_json::Value) -> Package {
        serde_json::from_value(value).unwrap()
    }

    fn item_json(id: &str) -> serde_json::Value {
        json!({"uri": format!("http://publicapi:5050/items/{id}"), "headline": id})
    }

    #[tokio::test]
    async fn test_composite_and_item_references() {
        let transport = StubTransport::new()
            .respond_json("/items/story", item_json("story"))
            .respond_json(
                "/packages/gallery",
                json!({
                    "uri": "http://publicapi:5050/packages/gallery",
                    "associations": {"main": {"pic": {"uri": "http://publicapi:5050/items/pic", "type": "picture"}}}
                }),
            )
            .respond_json("/items/pic", item_json("pic"));
        let mut sdk = sdk(&transport);

        let resolved = sdk
            .resolve_associations(package(json!({
                "uri": "http://publicapi:5050/packages/root",
                "associations": {"main": {
                    "story": {"uri": "http://publicapi:5050/items/story", "type": "text"},
                    "gallery": {"uri": "http://publicapi:5050/packages/gallery", "type": "composite"}
                }}
            })))
            .await;

        let main = &resolved.associations.as_ref().unwrap()["main"];
        match &main["story"] {
            Association::Item(item) => {
                assert_eq!(item.headline.as_deref(), Some("story"));
                assert_eq!(item.item_type.as_deref(), Some("text"));
            }
            other => panic!("expected item, got {other:?}"),
        }
        match &main["gallery"] {
            Association::Package(gallery) => {
                let pic = &gallery.associations.as_ref().unwrap()["main"]["pic"];
                assert!(matches!(pic, Association::Item(i) if i.item_type.as_deref() == Some("picture")));
            }
            other => panic!("expected package, got {other:?}"),
        }
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_entry_is_omitted_and_siblings_kept() {
        let transport = StubTransport::new()
            .respond_json("/items/good", item_json("good"))
            .respond("/items/broken", 500, "");
        let mut sdk = sdk(&transport);

        let original = package(json!({
            "uri": "root",
            "associations": {
                "main": {
                    "good": {"uri": "http://publicapi:5050/items/good", "type": "text"},
                    "broken": {"uri": "http://publicapi:5050/items/broken", "type": "text"}
                },
                "side": {
                    "missing": {"uri": "http://publicapi:5050/items/missing", "type": "text"}
                }
            }
        }));

        let report = sdk.get_associations_from_package(&original).await;
        assert_eq!(report.resolved_count(), 1);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(
            report.get("main", "broken").unwrap().as_ref().unwrap_err().status_code(),
            Some(500)
        );
        let failed: Vec<_> = report.failures().map(|(g, n, _)| (g, n)).collect();
        assert_eq!(failed, vec![("main", "broken"), ("side", "missing")]);

        let resolved = ContentApiSdk::inject_associations(original, report);
        let groups = resolved.associations.as_ref().unwrap();
        assert_eq!(groups["main"].len(), 1);
        assert!(matches!(groups["main"]["good"], Association::Item(_)));
        assert!(groups["side"].is_empty());
    }

    #[tokio::test]
    async fn test_all_failures_keep_original_references() {
        let transport = StubTransport::new();
        let mut sdk = sdk(&transport);

        let original = package(json!({
            "uri": "root",
            "associations": {"main": {
                "a": {"uri": "http://publicapi:5050/items/a", "type": "text"},
                "b": {"uri": "http://publicapi:5050/packages/b", "type": "composite"}
            }}
        }));

        let resolved = sdk.resolve_associations(original.clone()).await;

        assert_eq!(resolved, original);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_package_without_associations_is_unchanged() {
        let transport = StubTransport::new();
        let mut sdk = sdk(&transport);

        let original = package(json!({"uri": "root", "headline": "Lonely"}));
        let resolved = sdk.resolve_associations(original.clone()).await;

        assert_eq!(resolved, original);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_associations_are_left_alone() {
        let transport = StubTransport::new();
        let mut sdk = sdk(&transport);

        let original = package(json!({"uri": "root", "associations": {"main": {}}}));
        let resolved = sdk.resolve_associations(original.clone()).await;

        assert_eq!(resolved, original);
    }

    #[tokio::test]
    async fn test_entries_with_extra_fields_are_still_fetched() {
        let transport = StubTransport::new()
            .respond_json("/items/a", item_json("a"))
            .respond_json(
                "/packages/inner",
                json!({"uri": "http://publicapi:5050/packages/inner", "headline": "fresh"}),
            );
        let mut sdk = sdk(&transport);

        let report = sdk
            .get_associations_from_package(&package(json!({
                "uri": "root",
                "associations": {"main": {
                    "a": {"uri": "http://publicapi:5050/items/a", "type": "text", "version": "1"},
                    "inner": {
                        "uri": "http://publicapi:5050/packages/inner",
                        "type": "composite",
                        "headline": "stale"
                    }
                }}
            })))
            .await;

        assert_eq!(transport.paths(), vec!["/items/a", "/packages/inner"]);
        assert_eq!(report.resolved_count(), 2);
        match report.get("main", "a") {
            Some(Ok(Association::Item(item))) => {
                assert_eq!(item.headline.as_deref(), Some("a"));
                assert_eq!(item.item_type.as_deref(), Some("text"));
            }
            other => panic!("expected fetched item, got {other:?}"),
        }
        assert!(matches!(
            report.get("main", "inner"),
            Some(Ok(Association::Package(p))) if p.headline.as_deref() == Some("fresh")
        ));
    }

    #[tokio::test]
    async fn test_embedded_entry_that_cannot_be_fetched_is_omitted() {
        let transport = StubTransport::new();
        let mut sdk = sdk(&transport);

        let report = sdk
            .get_associations_from_package(&package(json!({
                "uri": "root",
                "associations": {"main": {
                    "gone": {"uri": "http://publicapi:5050/items/gone", "type": "text", "headline": "x"}
                }}
            })))
            .await;

        assert_eq!(report.resolved_count(), 0);
        assert_eq!(report.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_references_are_fetched_each_time() {
        let transport = StubTransport::new().always("/items/shared", 200, &item_json("shared").to_string());
        let mut sdk = sdk(&transport);

        sdk.resolve_associations(package(json!({
            "uri": "root",
            "associations": {"main": {
                "first": {"uri": "http://publicapi:5050/items/shared", "type": "text"},
                "second": {"uri": "http://publicapi:5050/items/shared", "type": "picture"}
            }}
        })))
        .await;

        assert_eq!(transport.paths(), vec!["/items/shared", "/items/shared"]);
    }

    #[tokio::test]
    async fn test_cycle_stops_at_max_depth() {
        let looping = json!({
            "uri": "http://publicapi:5050/packages/loop",
            "associations": {"main": {
                "self": {"uri": "http://publicapi:5050/packages/loop", "type": "composite"},
                "item": {"uri": "http://publicapi:5050/items/leaf", "type": "text"}
            }}
        });
        let transport = StubTransport::new()
            .always("/packages/loop", 200, &looping.to_string())
            .always("/items/leaf", 200, &item_json("leaf").to_string());
        let mut sdk = sdk(&transport).with_max_association_depth(2);

        let resolved = sdk.get_package("loop", true).await.unwrap();

        // root + two nested levels of the same package
        let package_fetches = transport
            .paths()
            .iter()
            .filter(|p| p.as_str() == "/packages/loop")
            .count();
        assert_eq!(package_fetches, 3);

        let level1 = match &resolved.associations.as_ref().unwrap()["main"]["self"] {
            Association::Package(p) => p.clone(),
            other => panic!("expected package, got {other:?}"),
        };
        let level2 = match &level1.associations.as_ref().unwrap()["main"]["self"] {
            Association::Package(p) => p.clone(),
            other => panic!("expected package, got {other:?}"),
        };
        // Deepest level dropped its self reference but kept the item
        let deepest = &level2.associations.as_ref().unwrap()["main"];
        assert!(!deepest.contains_key("self"));
        assert!(matches!(deepest["item"], Association::Item(_)));
    }

    #[tokio::test]
    async fn test_depth_exceeded_is_reported() {
        let transport = StubTransport::new();
        let mut sdk = sdk(&transport).with_max_association_depth(0);

        let report = sdk
            .get_associations_from_package(&package(json!({
                "uri": "root",
                "associations": {"main": {"p": {"uri": "http://publicapi:5050/packages/p", "type": "composite"}}}
            })))
            .await;

        assert!(matches!(
            report.get("main", "p"),
            Some(Err(ContentApiError::ResolutionDepthExceeded { depth: 0 }))
        ));
        assert!(transport.calls().is_empty());
    }
}
