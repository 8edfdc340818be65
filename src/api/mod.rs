//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers, request forms and response
//! structures.

pub mod forms;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_handler).post(create_handler))
        .route(
            "/timers/:id",
            get(get_handler).patch(edit_handler).delete(delete_handler),
        )
        .route("/timers/:id/start", post(start_handler))
        .route("/timers/:id/pause", post(pause_handler))
        .route("/timers/:id/reset", post(reset_handler))
        .route("/timers/:id/remaining", put(set_remaining_handler))
        .route("/actions", post(action_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
