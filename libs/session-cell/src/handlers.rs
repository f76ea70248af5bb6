use std::sync::Arc;

use axum::{
    extract::{Json, State},
    Extension,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_models::error::AppError;
use shared_models::session::{LoginRequest, User};
use shared_utils::session::SessionManager;

use crate::directory::UserDirectory;

pub struct SessionCellState {
    pub sessions: Arc<SessionManager>,
    pub directory: UserDirectory,
}

pub async fn login(
    State(state): State<Arc<SessionCellState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let user = state
        .directory
        .find_by_email(&request.email)
        .cloned()
        .ok_or_else(|| {
            warn!("Sign-in attempt for unknown email {}", request.email);
            AppError::Auth("Unknown user".to_string())
        })?;

    let session = state
        .sessions
        .login(user)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store session: {}", e)))?;

    Ok(Json(json!({
        "user": session.user,
        "signed_in_at": session.signed_in_at,
    })))
}

pub async fn logout(
    State(state): State<Arc<SessionCellState>>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .sessions
        .logout()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to clear session: {}", e)))?;

    Ok(Json(json!({
        "success": true,
        "user": user,
    })))
}

pub async fn me(
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    debug!("Session lookup for {}", user.email);
    Ok(Json(json!({ "user": user })))
}
