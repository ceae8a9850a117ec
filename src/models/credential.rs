use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The administrator account: a salted password digest, never the
/// password itself. Created once at startup if absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredential {
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}
