use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use gatepass_types::events::DashboardEvent;
use gatepass_types::models::{Submission, SubmissionStatus};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/proofs — submission intake.
///
/// Multipart form with text fields `user_id`, `username`, `plan` and a file
/// part `proof`. Any missing or empty field fails validation before anything
/// is written. On success: one file write, one store rewrite, one broadcast.
pub async fn submit_proof(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut user_id: Option<String> = None;
    let mut username: Option<String> = None;
    let mut plan: Option<String> = None;
    let mut proof: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed upload: {e}")))?
    {
        let read_err = |e| ApiError::Validation(format!("malformed upload: {e}"));
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("user_id") => user_id = Some(field.text().await.map_err(read_err)?),
            Some("username") => username = Some(field.text().await.map_err(read_err)?),
            Some("plan") => plan = Some(field.text().await.map_err(read_err)?),
            Some("proof") => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(read_err)?;
                proof = Some((original_name, bytes));
            }
            _ => {}
        }
    }

    let user_id = require_text(user_id, "user_id")?;
    let username = require_text(username, "username")?;
    let plan = require_text(plan, "plan")?;
    let (original_name, bytes) = match proof {
        Some((name, bytes)) if !bytes.is_empty() => (name, bytes),
        _ => return Err(ApiError::Validation("missing required field: proof".into())),
    };

    // Current time plus a random token: collisions are negligible, and the
    // original extension survives so the dashboard can render the file.
    let extension = std::path::Path::new(&original_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let filename = format!("{}_{}{}", Utc::now().timestamp_millis(), Uuid::new_v4(), extension);

    state.proofs.store(&filename, &bytes).await.map_err(|e| {
        error!("Failed to store proof file {}: {}", filename, e);
        ApiError::Internal(format!("failed to store proof file: {e}"))
    })?;

    let submission = Submission {
        id: Uuid::new_v4(),
        user_id,
        username,
        plan,
        proof_path: format!("/uploads/{filename}"),
        submitted_at: Utc::now(),
        status: SubmissionStatus::Pending,
    };

    let record = submission.clone();
    let store = state.clone();
    tokio::task::spawn_blocking(move || store.store.append(record))
        .await
        .map_err(|e| ApiError::Internal(format!("join error: {e}")))?;

    info!(
        "Submission {} created by {} ({}) for plan {}",
        submission.id, submission.username, submission.user_id, submission.plan
    );

    state.dispatcher.broadcast(DashboardEvent::SubmissionCreate {
        submission: submission.clone(),
    });

    Ok((StatusCode::CREATED, Json(submission)))
}

fn require_text(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("missing required field: {name}"))),
    }
}
