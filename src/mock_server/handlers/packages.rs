//! Package endpoint handlers.

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

/// GET /packages/{id}
pub async fn get_package(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&mut state, &headers) {
        return rejection;
    }

    match state.get_package(&id) {
        Some(package) => (StatusCode::OK, Json(package.clone())).into_response(),
        None => not_found("package", &id),
    }
}

/// GET /packages
pub async fn list_packages(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&mut state, &headers) {
        return rejection;
    }

    let packages = state.list_packages(query.q.as_deref());
    (StatusCode::OK, Json(paginate(packages, &query))).into_response()
}
