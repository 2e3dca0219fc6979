//! OAuth token endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// Form fields of a password grant.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /oauth/token
pub async fn issue_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Form(request): Form<TokenRequest>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    state.token_requests += 1;

    if request.grant_type != "password" {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "unsupported_grant_type"})),
        )
            .into_response();
    }

    if !state.accepts(&request.client_id, &request.username, &request.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "invalid_grant"})),
        )
            .into_response();
    }

    let token = state.issue_token();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 3600
        })),
    )
        .into_response()
}
