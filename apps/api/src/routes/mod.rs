pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/screen", post(handlers::handle_screen))
        // Uploaded resumes/JDs can exceed axum's 2 MB default.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
