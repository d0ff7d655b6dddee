use axum::{Extension, Json, extract::State};

use gatepass_types::api::Claims;
use gatepass_types::models::Submission;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/submissions — the pending queue, oldest first. This snapshot is
/// the dashboard's render-time view; live updates arrive over the gateway.
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let store = state.clone();
    let records = tokio::task::spawn_blocking(move || store.store.snapshot())
        .await
        .map_err(|e| ApiError::Internal(format!("join error: {e}")))?;
    Ok(Json(records))
}
