pub mod error;
pub mod messages;

use std::sync::Arc;

use axum::{Router, routing::get};

use pigeon_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Row cap for history requests that carry no `since_days_ago`.
    pub default_results_limit: u32,
}

/// All HTTP routes. Middleware (tracing, CORS) is layered on by the server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/messages",
            get(messages::list_all).post(messages::create_message),
        )
        .route("/v1/messages/{recipient}/{sender}", get(messages::list_between))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
