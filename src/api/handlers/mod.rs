use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{middleware, AppState};
use crate::forms;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
///
/// Not-found conditions are benign here and keep their message.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    let msg = e.to_string();

    if msg.contains("not found") {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::NOT_FOUND, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================
// Login / Logout
// ============================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// An already-authenticated caller is sent straight to the board.
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if middleware::has_session(&state, &headers) {
        Redirect::to("/view").into_response()
    } else {
        Json(serde_json::json!({ "authenticated": false })).into_response()
    }
}

/// Verify credentials and mint a session token. Failed attempts go back
/// to the login flow instead of surfacing an error.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.db.verify_login(&form.username, &form.password) {
        Ok(true) => {
            let token = state.sessions.create(&form.username);
            tracing::info!("Login for {}", form.username);
            Json(LoginResponse { token }).into_response()
        }
        Ok(false) => {
            tracing::warn!("Failed login attempt for {}", form.username);
            Redirect::to("/login").into_response()
        }
        Err(e) => internal_error(e).into_response(),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = middleware::bearer_token(&headers) {
        state.sessions.destroy(token);
    }
    Redirect::to("/").into_response()
}

// ============================================================
// Board view
// ============================================================

pub async fn view_board(
    State(state): State<AppState>,
) -> Result<Json<Board>, (StatusCode, String)> {
    state
        .db
        .get_board(&state.board)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Board not found".to_string()))
}

/// Single-entry detail view. A malformed or unknown id goes back to the
/// board listing; it is never a hard error.
pub async fn view_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<String>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&feedback_id) else {
        return Redirect::to("/view").into_response();
    };

    match state.db.get_feedback(&state.board, id) {
        Ok(Some(entry)) => Json(entry).into_response(),
        Ok(None) => Redirect::to("/view").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ============================================================
// Submissions
// ============================================================

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub feedback: String,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> Result<(StatusCode, Json<FeedbackEntry>), (StatusCode, String)> {
    let input = forms::build_feedback(&form.name, &form.company, &form.feedback);
    state
        .db
        .append_feedback(&state.board, input)
        .map(|entry| (StatusCode::CREATED, Json(entry)))
        .map_err(internal_error)
}

/// The survey form's field names depend on the configured question list,
/// so the body is taken as a raw field map.
pub async fn submit_survey(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<(StatusCode, Json<SurveyEntry>), (StatusCode, String)> {
    let input = forms::build_survey(&state.survey, &fields);
    state
        .db
        .append_survey(&state.board, input)
        .map(|entry| (StatusCode::CREATED, Json(entry)))
        .map_err(internal_error)
}

pub async fn survey_redirect() -> Redirect {
    Redirect::to("/feedback")
}

// ============================================================
// Deletion
// ============================================================

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub delete: Option<String>,
    #[serde(rename = "surveyDelete")]
    pub survey_delete: Option<String>,
}

pub async fn delete_redirect() -> Redirect {
    Redirect::to("/view")
}

/// Remove one entry from the board. The form names exactly one of the two
/// id fields; the feedback id wins if a malformed request carries both.
/// An unrecognized request is logged and mutates nothing.
pub async fn delete_entry(State(state): State<AppState>, Form(form): Form<DeleteForm>) -> Response {
    let outcome = if let Some(raw) = form.delete.as_deref() {
        remove_feedback(&state, raw)
    } else if let Some(raw) = form.survey_delete.as_deref() {
        remove_survey(&state, raw)
    } else {
        tracing::warn!("Unrecognized delete request: no entry id supplied");
        Ok(())
    };

    match outcome {
        Ok(()) => Redirect::to("/view").into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

fn remove_feedback(state: &AppState, raw: &str) -> anyhow::Result<()> {
    let Ok(id) = Uuid::parse_str(raw) else {
        tracing::warn!("Ignoring malformed feedback id in delete request");
        return Ok(());
    };
    if !state.db.delete_feedback(&state.board, id)? {
        tracing::debug!("Feedback {} was already gone", id);
    }
    Ok(())
}

fn remove_survey(state: &AppState, raw: &str) -> anyhow::Result<()> {
    let Ok(id) = Uuid::parse_str(raw) else {
        tracing::warn!("Ignoring malformed survey id in delete request");
        return Ok(());
    };
    if !state.db.delete_survey(&state.board, id)? {
        tracing::debug!("Survey {} was already gone", id);
    }
    Ok(())
}
