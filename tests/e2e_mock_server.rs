//! E2E tests using the mock Content API server.
//!
//! These tests exercise full workflows against the stateful mock server:
//! token issuing and expiry, listing, and recursive package resolution.

#![cfg(feature = "test-server")]

use contentapi::mock_server::{Fixtures, MockServer, MockState};
use contentapi::{
    Association, ContentApiError, ContentApiSdk, Get, Item, List, Package, PackageListQuery,
    RequestParameters,
};

// Server lifecycle

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url();

    server.shutdown().await;

    let result = reqwest::Client::new()
        .get(format!("{}/health", url))
        .send()
        .await;

    assert!(result.is_err());
}

// Item workflows

#[tokio::test]
async fn test_list_and_get_item_workflow() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();

    let page = Item::list_page(&mut sdk, &RequestParameters::new(), 1, 10)
        .await
        .expect("Failed to list items");
    assert!(!page.is_empty(), "Expected at least one item");

    let first = &page.items[0];
    let fetched = Item::get(&mut sdk, first.id()).await.expect("Failed to get item");

    assert_eq!(fetched.uri, first.uri);
    assert_eq!(fetched.headline, first.headline);

    // One token for the whole session
    assert_eq!(server.state().read().await.token_requests, 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_search_items() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();

    let query = RequestParameters::new().with_query("transfer");
    let page = Item::list_page(&mut sdk, &query, 1, 10).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.total, Some(1));
    assert_eq!(page.items[0].id(), "transfer-news");

    server.shutdown().await;
}

#[tokio::test]
async fn test_paging_through_items() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();
    let total = server.state().read().await.items.len();

    let mut seen = Vec::new();
    let mut items = sdk.get_items(RequestParameters::new()).unwrap();
    let mut offset = 0;
    loop {
        let slice = items.slice(offset, 2).await.unwrap();
        let last_page = slice.len() < 2;
        offset += 2;
        seen.extend(slice.into_iter().map(|i| i.id()));
        if last_page {
            break;
        }
    }

    assert_eq!(seen.len(), total);

    server.shutdown().await;
}

// Authentication workflows

#[tokio::test]
async fn test_expired_token_is_renewed() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();

    sdk.get_item("match-report").await.unwrap();
    server.state().write().await.reject_next_requests(1);

    let item = sdk.get_item("match-report").await.expect("retry should succeed");

    assert_eq!(item.id(), "match-report");
    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.token_requests, 2);
    assert_eq!(state.content_requests, 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_persistent_rejection_hits_retry_limit() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();
    server.state().write().await.reject_next_requests(10);

    let err = sdk.get_item("match-report").await.unwrap_err();

    assert!(matches!(err, ContentApiError::AccessDenied { .. }));
    assert_eq!(server.state().read().await.content_requests, 3);

    server.shutdown().await;
}

// Package workflows

#[tokio::test]
async fn test_resolve_nested_package() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();

    let package = sdk.get_package("sports-weekly", true).await.unwrap();
    let groups = package.associations.as_ref().unwrap();

    assert!(matches!(
        &groups["main"]["story"],
        Association::Item(item) if item.item_type.as_deref() == Some("text")
    ));
    assert!(matches!(&groups["sidebars"]["transfers"], Association::Item(_)));

    let Association::Package(gallery) = &groups["main"]["gallery"] else {
        panic!("gallery was not resolved");
    };
    let photos = &gallery.associations.as_ref().unwrap()["main"];
    assert_eq!(photos.len(), 2);
    assert!(photos
        .values()
        .all(|p| matches!(p, Association::Item(i) if i.item_type.as_deref() == Some("picture"))));

    server.shutdown().await;
}

#[tokio::test]
async fn test_dangling_reference_is_dropped() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();

    let package = sdk.get_package("partly-published", false).await.unwrap();
    let report = sdk.get_associations_from_package(&package).await;

    assert_eq!(report.resolved_count(), 1);
    assert_eq!(report.failed_count(), 1);
    let retracted = report.get("main", "retracted").unwrap();
    assert_eq!(retracted.as_ref().unwrap_err().status_code(), Some(404));

    let resolved = ContentApiSdk::inject_associations(package, report);
    let main = &resolved.associations.as_ref().unwrap()["main"];
    assert!(main.contains_key("story"));
    assert!(!main.contains_key("retracted"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_package_without_associations() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();

    let package = Package::get(&mut sdk, "empty-package".to_string()).await.unwrap();
    let resolved = sdk.resolve_associations(package.clone()).await;

    assert_eq!(resolved, package);

    server.shutdown().await;
}

#[tokio::test]
async fn test_list_packages_resolved() {
    let server = MockServer::start().await;
    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();

    let query = PackageListQuery {
        parameters: RequestParameters::new().with_query("sports"),
        resolve_associations: true,
    };
    let page = Package::list_page(&mut sdk, &query, 1, 10).await.unwrap();

    assert_eq!(page.len(), 1);
    let weekly = &page.items[0];
    assert!(weekly
        .associations
        .as_ref()
        .unwrap()
        .values()
        .flat_map(|group| group.values())
        .all(|entry| entry.as_reference().is_none()));

    server.shutdown().await;
}

// Custom state

#[tokio::test]
async fn test_custom_state_with_credentials() {
    let state = MockState::new()
        .with_item(Fixtures::text_item("only", "Only item", "Body"))
        .with_credentials("other-client", "other", "pw");
    let server = MockServer::with_state(state).await;

    let mut sdk = ContentApiSdk::from_config(&server.config()).unwrap();
    assert!(matches!(
        sdk.get_item("only").await,
        Err(ContentApiError::AccessDenied { .. })
    ));

    let config = server.config().with_credentials("other-client", "other", "pw");
    let mut sdk = ContentApiSdk::from_config(&config).unwrap();
    let item = sdk.get_item("only").await.unwrap();
    assert_eq!(item.body_text.as_deref(), Some("Body"));

    server.shutdown().await;
}
