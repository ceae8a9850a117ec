//! Credential hashing and session tracking.
//!
//! Passwords are stored as salted SHA-256 digests; a successful login
//! mints an opaque bearer token that the session store tracks until
//! logout. The HTTP gate itself lives in `api::middleware`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Digest a password with the given salt.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a fresh random salt.
pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Check a password attempt against a stored salt + digest.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

/// In-memory session registry mapping bearer tokens to usernames.
///
/// Sessions live for the lifetime of the process; logout removes them.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a session token for an authenticated user.
    pub fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.insert(token.clone(), username.to_string());
        token
    }

    /// Whether the token belongs to a live session.
    pub fn check(&self, token: &str) -> bool {
        let sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.contains_key(token)
    }

    /// Destroy a session. Unknown tokens are ignored.
    pub fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.remove(token);
    }
}
