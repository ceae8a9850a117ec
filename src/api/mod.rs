mod handlers;
pub mod middleware;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::SessionStore;
use crate::config::AppConfig;
use crate::db::Database;
use crate::forms::SurveyConfig;

/// Shared handler state: the store, live sessions, the board every
/// submission targets, and the survey shaping rules.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionStore,
    pub board: String,
    pub survey: SurveyConfig,
}

pub fn create_router(db: Database) -> Router {
    create_router_with_config(db, AppConfig::defaults())
}

pub fn create_router_with_config(db: Database, config: AppConfig) -> Router {
    let state = AppState {
        db,
        sessions: SessionStore::new(),
        board: config.board,
        survey: config.survey,
    };

    // View and delete require an authenticated session; everything else
    // is open to anonymous visitors.
    let admin = Router::new()
        .route("/view", get(handlers::view_board))
        .route("/view/{feedback_id}", get(handlers::view_feedback))
        .route(
            "/delete",
            get(handlers::delete_redirect).post(handlers::delete_entry),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    let public = Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/feedback", post(handlers::submit_feedback))
        .route(
            "/survey",
            get(handlers::survey_redirect).post(handlers::submit_survey),
        );

    Router::new()
        .merge(public)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
