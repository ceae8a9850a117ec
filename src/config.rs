//! Environment-supplied configuration.

use std::path::PathBuf;

use crate::forms::SurveyConfig;
use crate::models::DEFAULT_BOARD;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Name of the board every submission lands on (FEEDBACK_BOARD_PAGE).
    pub board: String,
    /// Admin account created at startup (FEEDBACK_BOARD_ADMIN_USERNAME).
    pub admin_username: Option<String>,
    /// Admin password (FEEDBACK_BOARD_ADMIN_PASSWORD).
    pub admin_password: Option<String>,
    /// Database file path (FEEDBACK_BOARD_DB); platform data dir when unset.
    pub db_path: Option<PathBuf>,
    /// Survey shaping: question slots and comment-trimming policy.
    pub survey: SurveyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let board =
            std::env::var("FEEDBACK_BOARD_PAGE").unwrap_or_else(|_| DEFAULT_BOARD.to_string());

        let admin_username = std::env::var("FEEDBACK_BOARD_ADMIN_USERNAME").ok();
        let admin_password = std::env::var("FEEDBACK_BOARD_ADMIN_PASSWORD").ok();

        let db_path = std::env::var("FEEDBACK_BOARD_DB").ok().map(PathBuf::from);

        // FEEDBACK_BOARD_RAW_COMMENTS=1 keeps per-question comments exactly
        // as submitted instead of trimming them.
        let raw_comments = std::env::var("FEEDBACK_BOARD_RAW_COMMENTS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let survey = SurveyConfig {
            trim_comments: !raw_comments,
            ..SurveyConfig::default()
        };

        Self {
            board,
            admin_username,
            admin_password,
            db_path,
            survey,
        }
    }

    /// Built-in defaults without touching the environment: the standard
    /// board and survey, no admin account, in-process storage choices
    /// left to the caller.
    pub fn defaults() -> Self {
        Self {
            board: DEFAULT_BOARD.to_string(),
            admin_username: None,
            admin_password: None,
            db_path: None,
            survey: SurveyConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
