use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};

use shared_models::{error::AppError, session::{Role, User}};
use shared_utils::extractor::require_role;
use shared_utils::session::SessionManager;
use shared_utils::validation::FormValidator;
use visit_cell::{available_actions, Appointment, FilterKey, MonthView, Visit, VisitFilter};

use crate::models::{
    AppointmentActionRequest, AppointmentQuery, BookAppointmentRequest, CalendarQuery, PaymentRequest,
    UpdateAppointmentRequest,
};
use crate::services::book::AppointmentBook;
use crate::services::booking::BookingService;
use crate::services::intake::{validate_booking, validate_payment};

pub struct AppointmentCellState {
    pub sessions: Arc<SessionManager>,
    pub book: Arc<RwLock<AppointmentBook>>,
    pub service: Arc<dyn BookingService>,
    pub validator: FormValidator,
    pub calendar_cell_limit: usize,
}

impl AppointmentCellState {
    pub fn new(
        sessions: Arc<SessionManager>,
        book: AppointmentBook,
        service: Arc<dyn BookingService>,
        calendar_cell_limit: usize,
    ) -> Self {
        Self {
            sessions,
            book: Arc::new(RwLock::new(book)),
            service,
            validator: FormValidator::new(),
            calendar_cell_limit,
        }
    }
}

/// Patients only ever see their own appointments.
fn patient_scope(user: &User) -> Option<&str> {
    match user.role {
        Role::Patient => Some(user.id.as_str()),
        _ => None,
    }
}

fn ensure_visible(user: &User, appointment: &Appointment) -> Result<(), AppError> {
    match patient_scope(user) {
        Some(patient_id) if appointment.patient.id != patient_id => {
            warn!("{} tried to reach appointment {} of another patient", user.email, appointment.id);
            Err(AppError::NotFound(format!("Appointment {} not found", appointment.id)))
        }
        _ => Ok(()),
    }
}

fn with_actions(appointment: &Appointment) -> Value {
    json!({
        "appointment": appointment,
        "available_actions": available_actions(Appointment::CONTEXT, appointment.status),
    })
}

pub async fn list_appointments(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Value>, AppError> {
    let book = state.book.read().await;
    let appointments = book.list_for(&query.to_filter(), patient_scope(&user));
    let total = book.list_for(&VisitFilter::new(), patient_scope(&user)).len();

    Ok(Json(json!({
        "appointments": appointments,
        "filtered": appointments.len(),
        "total": total,
    })))
}

pub async fn get_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let book = state.book.read().await;
    let appointment = book.get(&id)?;
    ensure_visible(&user, appointment)?;
    Ok(Json(with_actions(appointment)))
}

/// Validate the form, hand it to the booking service, then keep the result locally
pub async fn book_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(patient_id) = patient_scope(&user) {
        if request.patient.id != patient_id {
            return Err(AppError::Forbidden("Patients can only book for themselves".to_string()));
        }
    }

    let booking = validate_booking(&state.validator, &request, Utc::now().date_naive())?;
    info!("{} booking {} with {} on {}", user.email, booking.patient.name, booking.doctor.name, booking.date);

    let appointment = state.service.submit_booking(&booking).await?;
    let appointment = state.book.write().await.record_booking(appointment)?;
    Ok(Json(with_actions(&appointment)))
}

pub async fn update_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;

    let appointment = state.book.write().await.update(&id, request)?;
    Ok(Json(with_actions(&appointment)))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;
    info!("Appointment {} deleted by {}", id, user.email);

    let removed = state.book.write().await.remove(&id)?;
    Ok(Json(json!({
        "success": true,
        "id": removed.id,
    })))
}

pub async fn apply_appointment_action(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(request): Json<AppointmentActionRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &Role::STAFF_ROLES)?;
    info!("{} requested '{}' on appointment {}", user.email, request.action, id);

    let (appointment, transition) = state.book.write().await.apply(&id, request.action, Utc::now())?;
    Ok(Json(json!({
        "appointment": appointment,
        "transition": transition,
        "available_actions": available_actions(Appointment::CONTEXT, appointment.status),
    })))
}

/// Month grid; defaults to the current month
pub async fn get_appointment_calendar(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, AppError> {
    let today = MonthView::containing(Utc::now().date_naive());
    let view = MonthView::new(
        query.year.unwrap_or_else(|| today.year()),
        query.month.unwrap_or_else(|| today.month()),
    )?;
    let filter = VisitFilter::new()
        .with_select(FilterKey::Doctor, query.doctor)
        .with_select(FilterKey::Status, query.status);

    let grid = state
        .book
        .read()
        .await
        .calendar(view, &filter, patient_scope(&user), state.calendar_cell_limit);

    Ok(Json(json!({
        "calendar": grid,
        "prev": { "year": view.prev().year(), "month": view.prev().month() },
        "next": { "year": view.next().year(), "month": view.next().month() },
    })))
}

pub async fn process_payment(
    State(state): State<Arc<AppointmentCellState>>,
    Extension(user): Extension<User>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<Value>, AppError> {
    {
        let book = state.book.read().await;
        let appointment = book.get(&request.appointment_id)?;
        ensure_visible(&user, appointment)?;
    }

    validate_payment(&state.validator, &request, Utc::now().date_naive())?;
    let receipt = state.service.process_payment(&request).await?;

    info!("Payment {} recorded for appointment {}", receipt.receipt_id, receipt.appointment_id);
    Ok(Json(json!({ "receipt": receipt })))
}
