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
use visit_cell::{available_actions, FilterKey, MonthView, ScheduleSlot, Visit, VisitFilter};

use crate::models::{
    AddScheduleSlotRequest, ScheduleActionRequest, ScheduleCalendarQuery, ScheduleQuery, UpdateScheduleSlotRequest,
};
use crate::services::board::ScheduleBoard;

/// Roles allowed to change the timetable.
const SCHEDULE_EDITORS: [Role; 3] = [Role::Admin, Role::Receptionist, Role::Staff];

pub struct ScheduleCellState {
    pub sessions: Arc<SessionManager>,
    pub board: Arc<RwLock<ScheduleBoard>>,
    pub calendar_cell_limit: usize,
}

impl ScheduleCellState {
    pub fn new(sessions: Arc<SessionManager>, board: ScheduleBoard, calendar_cell_limit: usize) -> Self {
        Self {
            sessions,
            board: Arc::new(RwLock::new(board)),
            calendar_cell_limit,
        }
    }
}

fn with_actions(slot: &ScheduleSlot) -> Value {
    json!({
        "slot": slot,
        "slot_key": slot.slot_key(),
        "available_actions": available_actions(ScheduleSlot::CONTEXT, slot.status),
    })
}

pub async fn list_slots(
    State(state): State<Arc<ScheduleCellState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;

    let board = state.board.read().await;
    let slots = board.list(&query.to_filter());
    Ok(Json(json!({
        "slots": slots,
        "filtered": slots.len(),
        "total": board.slots().len(),
    })))
}

pub async fn get_slot(
    State(state): State<Arc<ScheduleCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;

    let board = state.board.read().await;
    Ok(Json(with_actions(board.get(&id)?)))
}

pub async fn add_slot(
    State(state): State<Arc<ScheduleCellState>>,
    Extension(user): Extension<User>,
    Json(request): Json<AddScheduleSlotRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &SCHEDULE_EDITORS)?;
    info!("Schedule slot added by {}", user.email);

    let slot = state.board.write().await.add(request)?;
    Ok(Json(with_actions(&slot)))
}

pub async fn update_slot(
    State(state): State<Arc<ScheduleCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(request): Json<UpdateScheduleSlotRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &SCHEDULE_EDITORS)?;

    let slot = state.board.write().await.update(&id, request)?;
    Ok(Json(with_actions(&slot)))
}

pub async fn delete_slot(
    State(state): State<Arc<ScheduleCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &SCHEDULE_EDITORS)?;
    info!("Schedule slot {} deleted by {}", id, user.email);

    let removed = state.board.write().await.remove(&id)?;
    Ok(Json(json!({
        "success": true,
        "id": removed.id,
    })))
}

pub async fn apply_slot_action(
    State(state): State<Arc<ScheduleCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(request): Json<ScheduleActionRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &SCHEDULE_EDITORS)?;
    info!("{} requested '{}' on slot {}", user.email, request.action, id);

    let (slot, transition) = state.board.write().await.apply(&id, request.action, Utc::now())?;
    Ok(Json(json!({
        "slot": slot,
        "transition": transition,
        "available_actions": available_actions(ScheduleSlot::CONTEXT, slot.status),
    })))
}

pub async fn get_schedule_calendar(
    State(state): State<Arc<ScheduleCellState>>,
    Extension(user): Extension<User>,
    Query(query): Query<ScheduleCalendarQuery>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;

    let today = MonthView::containing(Utc::now().date_naive());
    let view = MonthView::new(
        query.year.unwrap_or_else(|| today.year()),
        query.month.unwrap_or_else(|| today.month()),
    )?;
    let filter = VisitFilter::new()
        .with_select(FilterKey::Doctor, query.doctor)
        .with_select(FilterKey::Department, query.department);

    let grid = state.board.read().await.calendar(view, &filter, state.calendar_cell_limit);
    Ok(Json(json!({
        "calendar": grid,
        "prev": { "year": view.prev().year(), "month": view.prev().month() },
        "next": { "year": view.next().year(), "month": view.next().month() },
    })))
}
