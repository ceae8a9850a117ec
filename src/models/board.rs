use serde::{Deserialize, Serialize};

use super::{FeedbackEntry, SurveyEntry};

/// Default name of the singleton board.
pub const DEFAULT_BOARD: &str = "View";

/// The page aggregate: every feedback and survey entry submitted so far.
///
/// A board is created idempotently at startup and is the sole long-lived
/// mutable entity. Entries are appended in submission order and removed by
/// id; the relative order of the remaining entries never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub feedback: Vec<FeedbackEntry>,
    pub surveys: Vec<SurveyEntry>,
}
