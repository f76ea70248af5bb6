use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::{create_appointment_router, handlers::AppointmentCellState};
use medical_services_cell::{create_medical_services_router, MedicalServiceClient};
use queue_cell::{create_queue_router, handlers::QueueCellState};
use schedule_cell::{create_schedule_router, handlers::ScheduleCellState};
use session_cell::{handlers::SessionCellState, session_routes};

pub struct AppState {
    pub session: Arc<SessionCellState>,
    pub queue: Arc<QueueCellState>,
    pub appointments: Arc<AppointmentCellState>,
    pub schedules: Arc<ScheduleCellState>,
    pub medical_services: Arc<MedicalServiceClient>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Carepoint Hospital API is running!" }))
        .nest("/session", session_routes(state.session))
        .nest("/queue", create_queue_router(state.queue))
        .nest("/appointments", create_appointment_router(state.appointments))
        .nest("/schedules", create_schedule_router(state.schedules))
        .nest("/services", create_medical_services_router(state.medical_services))
}
