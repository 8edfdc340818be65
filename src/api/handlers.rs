//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::state::{AppState, Timer, TimerAction, TimerId};
use super::{
    forms::{RemainingTimeRequest, TimerForm},
    responses::{views, ApiResponse, ErrorResponse, HealthResponse, StatusResponse, TimerView},
};

/// Error half of every fallible handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found(id: TimerId) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("No timer with id {}", id))),
    )
}

/// Find `id` in a snapshot and render it
fn view_of(timers: &[Timer], id: TimerId) -> Result<Json<TimerView>, ApiError> {
    timers
        .iter()
        .find(|t| t.id() == id)
        .map(|t| Json(TimerView::from(t)))
        .ok_or_else(|| not_found(id))
}

/// 404 unless the timer currently exists
fn require(state: &AppState, id: TimerId) -> Result<(), ApiError> {
    state.timers.get(id).map(|_| ()).ok_or_else(|| not_found(id))
}

/// Handle GET /timers - List all timers in order
pub async fn list_handler(State(state): State<Arc<AppState>>) -> Json<Vec<TimerView>> {
    Json(views(&state.timers.snapshot()))
}

/// Handle POST /timers - Validate the form and add a timer
pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TimerForm>,
) -> Result<(StatusCode, Json<TimerView>), ApiError> {
    let valid = form.validate().map_err(|e| {
        warn!("Rejected new timer: {}", e);
        (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(e.to_string())))
    })?;

    let id = state.timers.add(valid.into_new_timer());
    let view = view_of(&state.timers.snapshot(), id)?;
    Ok((StatusCode::CREATED, view))
}

/// Handle GET /timers/:id - Return one timer
pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, ApiError> {
    view_of(&state.timers.snapshot(), id)
}

/// Handle PATCH /timers/:id - Validate the form and edit a timer
pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
    Json(form): Json<TimerForm>,
) -> Result<Json<TimerView>, ApiError> {
    require(&state, id)?;
    let valid = form.validate().map_err(|e| {
        warn!("Rejected edit of timer {}: {}", id, e);
        (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(e.to_string())))
    })?;

    view_of(&state.timers.edit(id, valid.into_update()), id)
}

/// Handle DELETE /timers/:id - Remove a timer
pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, ApiError> {
    require(&state, id)?;
    let timers = state.timers.delete(id);
    Ok(Json(ApiResponse::applied(format!("Timer {} deleted", id), &timers)))
}

/// Handle POST /timers/:id/start - Start counting down
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, ApiError> {
    require(&state, id)?;
    view_of(&state.timers.start(id), id)
}

/// Handle POST /timers/:id/pause - Stop counting down
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, ApiError> {
    require(&state, id)?;
    view_of(&state.timers.pause(id), id)
}

/// Handle POST /timers/:id/reset - Restore full duration and pause
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, ApiError> {
    require(&state, id)?;
    state.timers.reset(id);
    view_of(&state.timers.snapshot(), id)
}

/// Handle PUT /timers/:id/remaining - Overwrite remaining time
pub async fn set_remaining_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
    Json(request): Json<RemainingTimeRequest>,
) -> Result<Json<TimerView>, ApiError> {
    require(&state, id)?;
    view_of(&state.timers.set_remaining(id, request.remaining_time), id)
}

/// Handle POST /actions - Dispatch a raw tagged action.
///
/// Malformed or unknown actions are ignored rather than rejected, and so are
/// bulk loads, which only happen at startup.
pub async fn action_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Json<ApiResponse> {
    let action = match serde_json::from_value::<TimerAction>(body) {
        Ok(TimerAction::LoadAll(_)) => {
            warn!("Ignoring LOAD_TIMERS sent over HTTP");
            TimerAction::Unknown
        }
        Ok(action) => action,
        Err(e) => {
            warn!("Ignoring unreadable action: {}", e);
            TimerAction::Unknown
        }
    };

    let kind = action.kind();
    let before = state.timers.snapshot();
    let after = state.timers.dispatch(action);

    if Arc::ptr_eq(&before, &after) {
        Json(ApiResponse::ignored(format!("Action {} changed nothing", kind), &after))
    } else {
        info!("Action {} applied", kind);
        Json(ApiResponse::applied(format!("Action {} applied", kind), &after))
    }
}

/// Handle GET /status - Return collection and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timers = state.timers.snapshot();
    let (last_action, last_action_time) = state.timers.last_action();

    Json(StatusResponse {
        timer_count: timers.len(),
        running_count: timers.iter().filter(|t| t.is_running()).count(),
        completed_count: timers.iter().filter(|t| t.is_complete()).count(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        storage: state.storage.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
