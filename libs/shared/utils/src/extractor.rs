use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
    body::Body,
};

use shared_models::error::AppError;
use shared_models::session::{Role, User};

use crate::session::SessionManager;

// Rejects the request unless someone is signed in; the user rides along as an extension.
pub async fn session_middleware(
    State(sessions): State<Arc<SessionManager>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = sessions
        .current()
        .await
        .ok_or_else(|| AppError::Auth("No active session".to_string()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role '{}' is not allowed to perform this action",
            user.role
        )))
    }
}
