mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::auth;
use crate::models::*;

/// SQLite-backed store for boards, entries, and the admin credential.
///
/// Every operation runs with the connection mutex held, so storage calls
/// are serialized process-wide. Appends and removals are single SQL
/// statements keyed by board name rather than whole-aggregate rewrites;
/// concurrent submissions therefore cannot overwrite each other.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "feedback-board")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("feedback-board.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Board operations
    // ============================================================

    /// Create the board if it does not exist yet. Idempotent; the primary
    /// key on `name` means concurrent calls cannot create duplicates.
    pub fn ensure_board(&self, name: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        conn.execute(
            "INSERT OR IGNORE INTO boards (name, created_at) VALUES (?, ?)",
            (name, now.to_rfc3339()),
        )?;
        Ok(())
    }

    /// Load the full board: feedback and surveys in submission order.
    pub fn get_board(&self, name: &str) -> Result<Option<Board>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let exists: i32 = conn.query_row(
            "SELECT COUNT(*) FROM boards WHERE name = ?",
            [name],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, company, message, created_at
             FROM feedback_entries WHERE board = ? ORDER BY position",
        )?;
        let feedback = stmt
            .query_map([name], |row| {
                Ok(FeedbackEntry {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    company: row.get(2)?,
                    message: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, company, extra, created_at
             FROM survey_entries WHERE board = ? ORDER BY position",
        )?;
        let mut surveys = stmt
            .query_map([name], |row| {
                Ok(SurveyEntry {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    company: row.get(2)?,
                    ratings: Vec::new(),
                    extra: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT question, rating, comment
             FROM survey_ratings WHERE survey_id = ? ORDER BY position",
        )?;
        for survey in &mut surveys {
            survey.ratings = stmt
                .query_map([survey.id.to_string()], |row| {
                    Ok(RatingItem {
                        question: row.get(0)?,
                        rating: row.get(1)?,
                        comment: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(Some(Board {
            name: name.to_string(),
            feedback,
            surveys,
        }))
    }

    // ============================================================
    // Feedback operations
    // ============================================================

    /// Append a feedback entry to the board.
    ///
    /// The insert is a single statement that assigns the next position
    /// inline, so there is no read-then-write window for a concurrent
    /// append to clobber.
    pub fn append_feedback(&self, board: &str, input: NewFeedback) -> Result<FeedbackEntry> {
        let conn = self.conn.lock().expect("database lock poisoned");
        board_exists(&conn, board)?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO feedback_entries (id, board, position, name, company, message, created_at)
             VALUES (?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM feedback_entries WHERE board = ?), ?, ?, ?, ?)",
            (
                id.to_string(),
                board,
                board,
                &input.name,
                &input.company,
                &input.message,
                now.to_rfc3339(),
            ),
        )?;

        Ok(FeedbackEntry {
            id,
            name: input.name,
            company: input.company,
            message: input.message,
            created_at: now,
        })
    }

    /// Look up one feedback entry on the board.
    pub fn get_feedback(&self, board: &str, id: Uuid) -> Result<Option<FeedbackEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, company, message, created_at
             FROM feedback_entries WHERE board = ? AND id = ?",
        )?;

        let mut rows = stmt.query((board, id.to_string()))?;
        if let Some(row) = rows.next()? {
            Ok(Some(FeedbackEntry {
                id: parse_uuid(row.get::<_, String>(0)?),
                name: row.get(1)?,
                company: row.get(2)?,
                message: row.get(3)?,
                created_at: parse_datetime(row.get::<_, String>(4)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// Remove a feedback entry by id. Unknown ids are a no-op; remaining
    /// entries keep their positions and relative order.
    pub fn delete_feedback(&self, board: &str, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM feedback_entries WHERE board = ? AND id = ?",
            (board, id.to_string()),
        )?;
        Ok(rows > 0)
    }

    // ============================================================
    // Survey operations
    // ============================================================

    /// Append a survey entry and its rating rows in question order.
    pub fn append_survey(&self, board: &str, input: NewSurvey) -> Result<SurveyEntry> {
        let conn = self.conn.lock().expect("database lock poisoned");
        board_exists(&conn, board)?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO survey_entries (id, board, position, name, company, extra, created_at)
             VALUES (?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM survey_entries WHERE board = ?), ?, ?, ?, ?)",
            (
                id.to_string(),
                board,
                board,
                &input.name,
                &input.company,
                &input.extra,
                now.to_rfc3339(),
            ),
        )?;

        for (position, rating) in input.ratings.iter().enumerate() {
            conn.execute(
                "INSERT INTO survey_ratings (id, survey_id, position, question, rating, comment)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (
                    Uuid::new_v4().to_string(),
                    id.to_string(),
                    position as i64,
                    &rating.question,
                    &rating.rating,
                    &rating.comment,
                ),
            )?;
        }

        Ok(SurveyEntry {
            id,
            name: input.name,
            company: input.company,
            ratings: input.ratings,
            extra: input.extra,
            created_at: now,
        })
    }

    /// Remove a survey entry and its ratings by id. Unknown ids are a
    /// no-op.
    pub fn delete_survey(&self, board: &str, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "DELETE FROM survey_ratings WHERE survey_id IN
             (SELECT id FROM survey_entries WHERE board = ? AND id = ?)",
            (board, id.to_string()),
        )?;
        let rows = conn.execute(
            "DELETE FROM survey_entries WHERE board = ? AND id = ?",
            (board, id.to_string()),
        )?;
        Ok(rows > 0)
    }

    // ============================================================
    // Credential operations
    // ============================================================

    /// Create the admin credential if absent. Idempotent; an existing
    /// credential is never rehashed or overwritten.
    pub fn ensure_credential(&self, username: &str, password: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let existing: i32 = conn.query_row(
            "SELECT COUNT(*) FROM credentials WHERE username = ?",
            [username],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(());
        }

        let salt = auth::new_salt();
        let password_hash = auth::hash_password(password, &salt);
        let now = Utc::now();

        conn.execute(
            "INSERT INTO credentials (username, password_hash, salt, created_at)
             VALUES (?, ?, ?, ?)",
            (username, &password_hash, &salt, now.to_rfc3339()),
        )?;

        tracing::info!("Created admin credential for {}", username);
        Ok(())
    }

    pub fn get_credential(&self, username: &str) -> Result<Option<AdminCredential>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT username, password_hash, salt, created_at
             FROM credentials WHERE username = ?",
        )?;

        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            Ok(Some(AdminCredential {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                salt: row.get(2)?,
                created_at: parse_datetime(row.get::<_, String>(3)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// Check a login attempt. Unknown usernames simply fail the check.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<bool> {
        match self.get_credential(username)? {
            Some(credential) => Ok(auth::verify_password(
                password,
                &credential.salt,
                &credential.password_hash,
            )),
            None => Ok(false),
        }
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn board_exists(conn: &Connection, board: &str) -> Result<()> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM boards WHERE name = ?",
        [board],
        |row| row.get(0),
    )?;
    if count == 0 {
        anyhow::bail!("Board not found");
    }
    Ok(())
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
