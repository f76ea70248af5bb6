use std::sync::Arc;
use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_utils::extractor::session_middleware;
use crate::handlers::{
    AppointmentCellState,
    list_appointments,
    book_appointment,
    get_appointment_calendar,
    process_payment,
    get_appointment,
    update_appointment,
    delete_appointment,
    apply_appointment_action,
};

pub fn create_appointment_router(state: Arc<AppointmentCellState>) -> Router {
    Router::new()
        .route("/", get(list_appointments).post(book_appointment))
        .route("/calendar", get(get_appointment_calendar))
        .route("/payments", post(process_payment))
        .route("/{id}", get(get_appointment).put(update_appointment).delete(delete_appointment))
        .route("/{id}/actions", post(apply_appointment_action))
        .layer(middleware::from_fn_with_state(state.sessions.clone(), session_middleware))
        .with_state(state)
}
