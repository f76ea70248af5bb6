use std::sync::Arc;
use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_utils::extractor::session_middleware;
use crate::handlers::{
    QueueCellState,
    list_queue,
    add_queue_item,
    get_queue_stats,
    get_queue_item,
    update_queue_item,
    delete_queue_item,
    apply_queue_action,
    move_queue_item_up,
    move_queue_item_down,
};

pub fn create_queue_router(state: Arc<QueueCellState>) -> Router {
    Router::new()
        .route("/", get(list_queue).post(add_queue_item))
        .route("/stats", get(get_queue_stats))
        .route("/{id}", get(get_queue_item).put(update_queue_item).delete(delete_queue_item))
        .route("/{id}/actions", post(apply_queue_action))
        .route("/{id}/move-up", post(move_queue_item_up))
        .route("/{id}/move-down", post(move_queue_item_down))
        .layer(middleware::from_fn_with_state(state.sessions.clone(), session_middleware))
        .with_state(state)
}
