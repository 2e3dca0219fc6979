//! Helpers shared by the wiremock integration tests.

#![allow(dead_code)]

use contentapi::{ClientConfig, ContentApiSdk};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// SDK pointed at the wiremock server, using the real reqwest transport and
/// the OAuth password grant.
pub fn sdk_for(server: &MockServer) -> ContentApiSdk {
    ContentApiSdk::from_config(&config_for(server)).unwrap()
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    let addr = server.address();
    ClientConfig::new(addr.ip().to_string())
        .with_port(addr.port())
        .with_protocol("http")
        .with_credentials("client", "editor", "secret")
}

/// Answer every token request with `token`.
pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

pub fn item_json(id: &str, headline: &str) -> Value {
    json!({
        "uri": format!("http://publicapi:5050/items/{id}"),
        "headline": headline,
        "versioncreated": "2024-05-17T09:30:00Z",
        "language": "en"
    })
}

pub fn listing(items: Vec<Value>, total: u64) -> Value {
    json!({
        "_meta": {"page": 1, "max_results": 25, "total": total},
        "_items": items
    })
}
