use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Submission;

/// Events pushed to connected dashboard viewers over the WebSocket gateway.
///
/// Fire-and-forget: there is no backlog, so a viewer only observes events
/// published after it connected. The dashboard's initial render covers the
/// gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DashboardEvent {
    /// A new submission entered the pending queue.
    SubmissionCreate { submission: Submission },

    /// A submission was resolved (approved or rejected) and removed.
    SubmissionDelete { id: Uuid },
}
