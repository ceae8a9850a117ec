use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One submitted feedback message.
///
/// Immutable once stored; the board only ever removes it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a feedback entry.
///
/// `name` and `company` are expected to already be identity-sanitized;
/// `message` is stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub name: String,
    pub company: String,
    pub message: String,
}
