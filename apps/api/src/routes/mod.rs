pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/prep", post(handlers::handle_prep))
        .route("/api/session/:session_id", get(handlers::handle_get_session))
        .route("/api/answer", post(handlers::handle_answer))
        .route("/api/summarise", post(handlers::handle_summarise))
        .with_state(state)
}
