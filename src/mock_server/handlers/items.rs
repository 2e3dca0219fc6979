//! Item endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{authorize, not_found, paginate, ListQuery};
use crate::mock_server::state::MockState;

/// GET /items/{id}
pub async fn get_item(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&mut state, &headers) {
        return rejection;
    }

    match state.get_item(&id) {
        Some(item) => (StatusCode::OK, Json(item.clone())).into_response(),
        None => not_found("item", &id),
    }
}

/// GET /items
pub async fn list_items(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&mut state, &headers) {
        return rejection;
    }

    let items = state.list_items(query.q.as_deref());
    (StatusCode::OK, Json(paginate(items, &query))).into_response()
}
