use std::sync::Arc;
use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_utils::extractor::session_middleware;
use crate::handlers::{
    ScheduleCellState,
    list_slots,
    add_slot,
    get_schedule_calendar,
    get_slot,
    update_slot,
    delete_slot,
    apply_slot_action,
};

pub fn create_schedule_router(state: Arc<ScheduleCellState>) -> Router {
    Router::new()
        .route("/", get(list_slots).post(add_slot))
        .route("/calendar", get(get_schedule_calendar))
        .route("/{id}", get(get_slot).put(update_slot).delete(delete_slot))
        .route("/{id}/actions", post(apply_slot_action))
        .layer(middleware::from_fn_with_state(state.sessions.clone(), session_middleware))
        .with_state(state)
}
