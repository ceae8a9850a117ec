//! Session gate for the administrator-only routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::AppState;

/// Gate middleware: requests without a live session are redirected to the
/// login flow rather than receiving an error.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match bearer_token(request.headers()) {
        Some(token) if state.sessions.check(token) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Rejected request with unknown session token");
            Redirect::to("/login").into_response()
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Whether the request carries a live session token.
pub fn has_session(state: &AppState, headers: &HeaderMap) -> bool {
    bearer_token(headers).is_some_and(|token| state.sessions.check(token))
}

pub(super) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
