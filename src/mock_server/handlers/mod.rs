//! HTTP request handlers for the mock server.

pub mod auth;
pub mod items;
pub mod packages;

pub use auth::*;
pub use items::*;
pub use packages::*;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::mock_server::state::MockState;
use crate::request::AUTHORIZATION_HEADER;

/// Query parameters accepted by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub max_results: Option<u32>,
}

impl ListQuery {
    /// Page and page size, falling back to the API defaults.
    fn window(&self) -> (u32, u32) {
        (
            self.page.unwrap_or(1).max(1),
            self.max_results.unwrap_or(crate::DEFAULT_MAX_RESULTS).max(1),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub page: u32,
    pub max_results: u32,
    pub total: u64,
}

/// Listing envelope: `{"_meta": {...}, "_items": [...]}`.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    #[serde(rename = "_meta")]
    pub meta: ListMeta,
    #[serde(rename = "_items")]
    pub items: Vec<T>,
}

/// Slice `all` according to the query and wrap it in a listing envelope.
fn paginate<T: Clone>(all: Vec<&T>, query: &ListQuery) -> ListResponse<T> {
    let (page, max_results) = query.window();
    let total = all.len() as u64;
    let start = ((page - 1) as usize).saturating_mul(max_results as usize);

    let items = all
        .into_iter()
        .skip(start)
        .take(max_results as usize)
        .cloned()
        .collect();

    ListResponse {
        meta: ListMeta {
            page,
            max_results,
            total,
        },
        items,
    }
}

/// Check the `Authorization: OAuth2 <token>` header against the issued token.
///
/// Pending forced rejections are consumed first, simulating expired tokens.
fn authorize(state: &mut MockState, headers: &HeaderMap) -> Result<(), Response> {
    state.content_requests += 1;

    if state.reject_next > 0 {
        state.reject_next -= 1;
        return Err(unauthorized("token expired"));
    }

    let presented = headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("OAuth2 "));

    match (presented, state.current_token()) {
        (Some(presented), Some(current)) if presented == current => Ok(()),
        _ => Err(unauthorized("invalid or missing access token")),
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "_status": "ERR",
            "_error": {"code": 401, "message": message}
        })),
    )
        .into_response()
}

fn not_found(kind: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "_status": "ERR",
            "_error": {"code": 404, "message": format!("No {kind} found with id: {id}")}
        })),
    )
        .into_response()
}
