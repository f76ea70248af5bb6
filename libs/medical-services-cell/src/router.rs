use std::sync::Arc;
use axum::{Router, routing::get};

use crate::handlers::list_medical_services;
use crate::services::catalog::MedicalServiceClient;

pub fn create_medical_services_router(client: Arc<MedicalServiceClient>) -> Router {
    Router::new()
        .route("/", get(list_medical_services))
        .with_state(client)
}
