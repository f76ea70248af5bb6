use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::info;

use shared_models::{error::AppError, session::{Role, User}};
use shared_utils::extractor::require_role;
use shared_utils::session::SessionManager;
use visit_cell::{available_actions, QueueItem, Visit};

use crate::models::{AddQueueItemRequest, QueueActionRequest, QueueQuery, UpdateQueueItemRequest};
use crate::services::board::QueueBoard;

pub struct QueueCellState {
    pub sessions: Arc<SessionManager>,
    pub board: Arc<RwLock<QueueBoard>>,
}

impl QueueCellState {
    pub fn new(sessions: Arc<SessionManager>, board: QueueBoard) -> Self {
        Self {
            sessions,
            board: Arc::new(RwLock::new(board)),
        }
    }
}

fn with_actions(item: &QueueItem) -> Value {
    json!({
        "item": item,
        "available_actions": available_actions(QueueItem::CONTEXT, item.status),
    })
}

/// List the queue in call order
pub async fn list_queue(
    State(state): State<Arc<QueueCellState>>,
    Query(query): Query<QueueQuery>,
) -> Result<Json<Value>, AppError> {
    let board = state.board.read().await;
    let filter = query.to_filter();
    let items = board.list(&filter);

    Ok(Json(json!({
        "items": items,
        "filtered": items.len(),
        "total": board.items().len(),
    })))
}

pub async fn get_queue_stats(
    State(state): State<Arc<QueueCellState>>,
) -> Result<Json<Value>, AppError> {
    let stats = state.board.read().await.stats();
    Ok(Json(json!(stats)))
}

pub async fn get_queue_item(
    State(state): State<Arc<QueueCellState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let board = state.board.read().await;
    let item = board.get(&id)?;
    Ok(Json(with_actions(item)))
}

/// Check a patient into the queue
pub async fn add_queue_item(
    State(state): State<Arc<QueueCellState>>,
    Extension(user): Extension<User>,
    Json(request): Json<AddQueueItemRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;
    info!("Queue check-in by {}", user.email);

    let item = state.board.write().await.add(request, Utc::now())?;
    Ok(Json(with_actions(&item)))
}

pub async fn update_queue_item(
    State(state): State<Arc<QueueCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(request): Json<UpdateQueueItemRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;

    let item = state.board.write().await.update(&id, request)?;
    Ok(Json(with_actions(&item)))
}

pub async fn delete_queue_item(
    State(state): State<Arc<QueueCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;
    info!("Queue item {} deleted by {}", id, user.email);

    let removed = state.board.write().await.remove(&id)?;
    Ok(Json(json!({
        "success": true,
        "id": removed.id,
    })))
}

/// Call / start / complete / cancel / no-show
pub async fn apply_queue_action(
    State(state): State<Arc<QueueCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(request): Json<QueueActionRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;
    info!("{} requested '{}' on queue item {}", user.email, request.action, id);

    let (item, transition) = state.board.write().await.apply(&id, request.action, Utc::now())?;
    Ok(Json(json!({
        "item": item,
        "transition": transition,
        "available_actions": available_actions(QueueItem::CONTEXT, item.status),
    })))
}

pub async fn move_queue_item_up(
    State(state): State<Arc<QueueCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;

    let mut board = state.board.write().await;
    let moved = board.move_up(&id)?;
    Ok(Json(json!({
        "moved": moved,
        "items": board.items(),
    })))
}

pub async fn move_queue_item_down(
    State(state): State<Arc<QueueCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;

    let mut board = state.board.write().await;
    let moved = board.move_down(&id)?;
    Ok(Json(json!({
        "moved": moved,
        "items": board.items(),
    })))
}
