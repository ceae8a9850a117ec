//! Form-field shaping: the rating vocabulary, the anonymity filter, and
//! the assembly of submitted fields into storable entries.

use std::collections::HashMap;

use crate::models::{NewFeedback, NewSurvey, RatingItem};

/// Rating codes the survey form submits, paired with the labels we store.
/// Codes outside this vocabulary pass through unchanged.
const RATING_LABELS: &[(&str, &str)] = &[
    ("vGood", "Very Good"),
    ("good", "Good"),
    ("norm", "Normal"),
    ("poor", "Poor"),
    ("vPoor", "Very Poor"),
];

/// Translate a machine-facing rating code to its display label.
///
/// Unknown codes are returned as-is rather than rejected; the forms have
/// always been permissive about this.
pub fn normalize_rating(code: &str) -> String {
    RATING_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Trim a free-text identity field, substituting `"Anonymous"` when the
/// visitor left it blank.
pub fn sanitize_identity(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        "Anonymous".to_string()
    } else {
        text.to_string()
    }
}

/// One survey question slot: the stored label and the form fields the
/// rating code and comment arrive under.
#[derive(Debug, Clone)]
pub struct SurveyQuestion {
    pub label: String,
    pub rating_field: String,
    pub comment_field: String,
}

impl SurveyQuestion {
    pub fn new(
        label: impl Into<String>,
        rating_field: impl Into<String>,
        comment_field: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            rating_field: rating_field.into(),
            comment_field: comment_field.into(),
        }
    }
}

/// Survey shaping configuration.
///
/// The question list is ordered; entries are stored in exactly this order.
/// `trim_comments` controls whether per-question comments are
/// whitespace-trimmed before storage — historical revisions of the form
/// disagreed on this, so it stays a switch rather than being silently
/// unified with the identity filter (which never applies to comments).
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    pub questions: Vec<SurveyQuestion>,
    pub trim_comments: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            questions: vec![
                SurveyQuestion::new("Social Skills", "socialSkills", "socialExtra"),
                SurveyQuestion::new("Technical Skills", "techSkills", "techExtra"),
                SurveyQuestion::new("Technical Task", "techTask", "techTaskExtra"),
            ],
            trim_comments: true,
        }
    }
}

/// Shape a feedback submission. Identity fields go through the anonymity
/// filter; the message is stored verbatim.
pub fn build_feedback(name: &str, company: &str, message: &str) -> NewFeedback {
    NewFeedback {
        name: sanitize_identity(name),
        company: sanitize_identity(company),
        message: message.to_string(),
    }
}

/// Shape a survey submission from raw form fields.
///
/// Missing fields read as empty strings, matching how the form behaves
/// when a visitor skips a question.
pub fn build_survey(config: &SurveyConfig, fields: &HashMap<String, String>) -> NewSurvey {
    let field = |key: &str| fields.get(key).map(String::as_str).unwrap_or("");

    let ratings = config
        .questions
        .iter()
        .map(|q| {
            let comment = field(&q.comment_field);
            RatingItem {
                question: q.label.clone(),
                rating: normalize_rating(field(&q.rating_field)),
                comment: if config.trim_comments {
                    comment.trim().to_string()
                } else {
                    comment.to_string()
                },
            }
        })
        .collect();

    NewSurvey {
        name: sanitize_identity(field("name")),
        company: sanitize_identity(field("company")),
        ratings,
        extra: sanitize_identity(field("extra")),
    }
}
