pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_resume_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/criteria", get(handlers::handle_get_criteria))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route(
            "/api/v1/session/candidate",
            put(handlers::handle_put_candidate),
        )
        .route(
            "/api/v1/session/scores/:criterion",
            put(handlers::handle_put_score),
        )
        .route(
            "/api/v1/session/comments",
            put(handlers::handle_put_comments),
        )
        .route(
            "/api/v1/session/resume",
            post(handlers::handle_upload_resume).delete(handlers::handle_clear_resume),
        )
        .route("/api/v1/session/submit", post(handlers::handle_submit))
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        .route("/api/v1/session/invite", get(handlers::handle_invite))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
