pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::profiles::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Profile extraction
        .route("/api/v1/profiles/parse", post(handlers::handle_parse))
        .route(
            "/api/v1/profiles/benchmark",
            post(handlers::handle_benchmark),
        )
        .route("/api/v1/adapters", get(handlers::handle_list_adapters))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
