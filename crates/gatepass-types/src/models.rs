use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending payment-proof submission awaiting admin review.
///
/// Submissions are created by intake and destroyed by the review workflow —
/// approval and rejection both resolve by deletion, so a persisted record is
/// always pending in practice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    /// Telegram user/chat the outcome is delivered to.
    pub user_id: String,
    /// Display name, informational only.
    pub username: String,
    /// Plan label chosen by the user. Drives channel selection on approval.
    pub plan: String,
    /// Relative URL path (`/uploads/<filename>`) of the stored proof file.
    pub proof_path: String,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

impl Submission {
    /// The lifetime plan grants access to both channels; everything else
    /// grants the premium channel only. Comparison is case-insensitive.
    pub fn is_lifetime(&self) -> bool {
        self.plan.eq_ignore_ascii_case("lifetime")
    }

    /// Filename component of `proof_path`, if it points into the uploads dir.
    pub fn proof_filename(&self) -> Option<&str> {
        self.proof_path.strip_prefix("/uploads/")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}
