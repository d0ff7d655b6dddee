use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use gatepass_types::api::ActionResponse;
use gatepass_types::events::DashboardEvent;
use gatepass_types::models::Submission;

use crate::error::ApiError;
use crate::state::AppState;

/// Invite links admit a single member and expire a day after issuance.
const INVITE_MEMBER_LIMIT: u32 = 1;
const INVITE_TTL_SECS: i64 = 86_400;

/// POST /api/submissions/{id}/approve
///
/// Issues fresh invite links for the channels the plan grants, delivers them
/// to the user, then resolves the submission. Link issuance is
/// all-or-nothing: any failed link request aborts before a single message is
/// sent and leaves the record untouched. Once links are issued they are live
/// on Telegram's side, so a failed delivery no longer aborts — the record is
/// resolved regardless and the failure logged.
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ApiError> {
    let _permit = state
        .review_guard
        .acquire(id)
        .ok_or(ApiError::ReviewInProgress)?;
    let submission = lookup(&state, id).await?;

    let expire_at = Utc::now() + Duration::seconds(INVITE_TTL_SECS);
    let plan = submission.plan.to_lowercase();

    let messages = if submission.is_lifetime() {
        let premium = state
            .bot
            .create_invite_link(&state.channels.premium, INVITE_MEMBER_LIMIT, expire_at)
            .await?;
        let lifetime = state
            .bot
            .create_invite_link(&state.channels.lifetime, INVITE_MEMBER_LIMIT, expire_at)
            .await?;
        vec![
            "🎉 Your payment has been approved for the *Lifetime* plan!".to_string(),
            format!("👉 Join Premium:\n{premium}"),
            format!("👉 Join Lifetime:\n{lifetime}"),
        ]
    } else {
        let link = state
            .bot
            .create_invite_link(&state.channels.premium, INVITE_MEMBER_LIMIT, expire_at)
            .await?;
        vec![format!(
            "🎉 Your payment has been approved for the *{plan}* plan!\n👉 Join Premium:\n{link}"
        )]
    };

    for text in &messages {
        if let Err(e) = state
            .bot
            .send_message(&submission.user_id, text, true)
            .await
        {
            warn!(
                "Invite links for {} issued but delivery to {} failed: {}",
                id, submission.user_id, e
            );
            break;
        }
    }

    resolve(&state, submission).await?;
    info!("Submission {} approved ({} plan)", id, plan);
    Ok(Json(ActionResponse { success: true }))
}

/// POST /api/submissions/{id}/reject
///
/// The decline notice is best effort; the submission is resolved either way.
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ApiError> {
    let _permit = state
        .review_guard
        .acquire(id)
        .ok_or(ApiError::ReviewInProgress)?;
    let submission = lookup(&state, id).await?;

    if let Err(e) = state
        .bot
        .send_message(
            &submission.user_id,
            &decline_text(&state.contact_handle),
            false,
        )
        .await
    {
        warn!("Decline notice for {} failed to send: {}", id, e);
    }

    resolve(&state, submission).await?;
    info!("Submission {} rejected", id);
    Ok(Json(ActionResponse { success: true }))
}

/// POST /api/submissions/{id}/contact
///
/// Sends the instructional message. Never mutates the record.
pub async fn contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ApiError> {
    let submission = lookup(&state, id).await?;

    state
        .bot
        .send_message(
            &submission.user_id,
            &contact_text(&state.contact_handle),
            true,
        )
        .await?;

    info!("Contact message sent for submission {}", id);
    Ok(Json(ActionResponse { success: true }))
}

async fn lookup(state: &AppState, id: Uuid) -> Result<Submission, ApiError> {
    let store = state.clone();
    tokio::task::spawn_blocking(move || store.store.find(id))
        .await
        .map_err(|e| ApiError::Internal(format!("join error: {e}")))?
        .ok_or(ApiError::NotFound)
}

/// Remove the submission and everything attached to it: proof file first,
/// record second, then the deleted event.
async fn resolve(state: &AppState, submission: Submission) -> Result<(), ApiError> {
    if let Some(filename) = submission.proof_filename() {
        if let Err(e) = state.proofs.remove(filename).await {
            warn!(
                "Failed to delete proof file for {}: {}",
                submission.id, e
            );
        }
    }

    let id = submission.id;
    let store = state.clone();
    let removed = tokio::task::spawn_blocking(move || store.store.remove(id))
        .await
        .map_err(|e| ApiError::Internal(format!("join error: {e}")))?;
    if removed.is_none() {
        return Err(ApiError::Internal(format!(
            "submission {id} disappeared during review"
        )));
    }

    state
        .dispatcher
        .broadcast(DashboardEvent::SubmissionDelete { id });
    Ok(())
}

fn decline_text(handle: &str) -> String {
    format!(
        "⚠️ Sorry, your payment could not be approved by the admin.\n\n\
         Want to know why? Ask here 👉 {handle}"
    )
}

fn contact_text(handle: &str) -> String {
    format!(
        "📢 What you need to do now:\n\n\
         Please message the admin here 👉 {handle}\n\n\
         And include:\n\
         ✅ Your game ID\n\
         ✅ A request to approve your payment so you can join the Premium channel"
    )
}

/// Per-id exclusivity for review actions. Two concurrent approvals of the
/// same submission would both pass the lookup and double-issue invite
/// links; the guard makes the second caller fail fast with a conflict
/// instead.
#[derive(Clone, Default)]
pub struct ReviewGuard {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl ReviewGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for the duration of the returned permit. `None` if another
    /// review action already holds it.
    pub fn acquire(&self, id: Uuid) -> Option<ReviewPermit> {
        let mut in_flight = self.lock();
        if in_flight.insert(id) {
            Some(ReviewPermit {
                id,
                guard: self.clone(),
            })
        } else {
            None
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<Uuid>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct ReviewPermit {
    id: Uuid,
    guard: ReviewGuard,
}

impl Drop for ReviewPermit {
    fn drop(&mut self) {
        self.guard.lock().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_rejects_second_acquire() {
        let guard = ReviewGuard::new();
        let id = Uuid::new_v4();

        let permit = guard.acquire(id).unwrap();
        assert!(guard.acquire(id).is_none());

        drop(permit);
        assert!(guard.acquire(id).is_some());
    }

    #[test]
    fn guard_tracks_ids_independently() {
        let guard = ReviewGuard::new();
        let _a = guard.acquire(Uuid::new_v4()).unwrap();
        let _b = guard.acquire(Uuid::new_v4()).unwrap();
    }

    #[test]
    fn decline_text_names_the_contact_handle() {
        assert!(decline_text("@gatepass_admin").contains("@gatepass_admin"));
        assert!(contact_text("@gatepass_admin").contains("@gatepass_admin"));
    }
}
