use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::services::catalog::MedicalServiceClient;

/// Public catalog listing for the landing page
pub async fn list_medical_services(
    State(client): State<Arc<MedicalServiceClient>>,
) -> Result<Json<Value>, AppError> {
    let response = client.get_all_services().await;
    Ok(Json(json!(response)))
}
