use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One answered survey question: the fixed question label, the
/// human-readable rating, and the respondent's free-text comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingItem {
    pub question: String,
    pub rating: String,
    pub comment: String,
}

/// One submitted survey: per-question ratings in question order plus an
/// overall extra comment. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyEntry {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub ratings: Vec<RatingItem>,
    pub extra: String,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a survey entry. Ratings are already normalized and
/// ordered by question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSurvey {
    pub name: String,
    pub company: String,
    pub ratings: Vec<RatingItem>,
    pub extra: String,
}
