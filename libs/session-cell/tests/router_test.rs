use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

use session_cell::{handlers::SessionCellState, session_routes, UserDirectory};
use shared_utils::session::{FileStore, SessionManager};

fn app(sessions: Arc<SessionManager>) -> Router {
    session_routes(Arc::new(SessionCellState {
        sessions,
        directory: UserDirectory::demo(),
    }))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn login_me_logout() {
    let app = app(Arc::new(SessionManager::in_memory()));

    let (status, _) = send(app.clone(), "GET", "/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(app.clone(), "POST", "/login", Some(json!({"email": "reception@carepoint.health"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "receptionist");

    let (status, body) = send(app.clone(), "GET", "/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "U002");

    let (status, body) = send(app.clone(), "POST", "/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "reception@carepoint.health");

    let (status, _) = send(app, "GET", "/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_and_empty_emails_are_rejected() {
    let app = app(Arc::new(SessionManager::in_memory()));

    let (status, body) = send(app.clone(), "POST", "/login", Some(json!({"email": "who@else.org"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unknown user");

    let (status, _) = send(app, "POST", "/login", Some(json!({"email": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_without_session_is_harmless() {
    let app = app(Arc::new(SessionManager::in_memory()));
    let (status, body) = send(app, "POST", "/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], Value::Null);
}

#[tokio::test]
async fn session_survives_restart_with_file_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = Arc::new(SessionManager::new(Arc::new(FileStore::new(&path))));
    first.init().await;
    let (status, _) = send(app(first), "POST", "/login", Some(json!({"email": "doctor@carepoint.health"}))).await;
    assert_eq!(status, StatusCode::OK);

    let second = Arc::new(SessionManager::new(Arc::new(FileStore::new(&path))));
    let restored = second.init().await.unwrap();
    assert_eq!(restored.name, "Dr. Sarah Wilson");

    let (status, body) = send(app(second), "GET", "/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "doctor");
}
