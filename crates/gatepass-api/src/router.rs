use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Query, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use gatepass_gateway::connection;

use crate::error::ApiError;
use crate::middleware::{require_admin, verify_token};
use crate::state::AppState;
use crate::{auth, intake, review, submissions};

/// Proof uploads are images or PDFs; 10 MB is plenty.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Assemble the HTTP surface. Static assets (dashboard, stored proofs) are
/// layered on by the server binary, which owns the directories.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/api/proofs", post(intake::submit_proof))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/submissions", get(submissions::list_pending))
        .route("/api/submissions/{id}/approve", post(review::approve))
        .route("/api/submissions/{id}/reject", post(review::reject))
        .route("/api/submissions/{id}/contact", post(review::contact))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ))
        .with_state(state.clone());

    let gateway = Router::new()
        .route("/gateway", get(gateway_upgrade))
        .with_state(state);

    Router::new().merge(public).merge(protected).merge(gateway)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct GatewayQuery {
    token: String,
}

/// Browsers cannot set headers on WebSocket upgrades, so the admin token
/// rides in the query string and is validated before the upgrade completes.
async fn gateway_upgrade(
    State(state): State<AppState>,
    Query(query): Query<GatewayQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    verify_token(&state.jwt_secret, &query.token)?;

    let dispatcher = state.dispatcher.clone();
    Ok(ws
        .on_upgrade(move |socket| connection::handle_connection(socket, dispatcher))
        .into_response())
}
