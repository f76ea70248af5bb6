// =====================================================================================
// SCHEDULE CELL ROUTER TESTS
// =====================================================================================

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tower::ServiceExt;

use schedule_cell::{create_schedule_router, handlers::ScheduleCellState, AddScheduleSlotRequest, ScheduleBoard};
use shared_utils::test_utils::{signed_in, TestUser};
use visit_cell::{DoctorRef, PatientRef};

fn slot(id: &str, doctor_id: &str, day: u32, hour: u32) -> AddScheduleSlotRequest {
    AddScheduleSlotRequest {
        id: Some(id.to_string()),
        doctor: DoctorRef { id: doctor_id.to_string(), name: format!("Dr. {}", doctor_id) },
        patient: Some(PatientRef {
            id: "P001".to_string(),
            name: "John Smith".to_string(),
            phone: "+1 555 123 4567".to_string(),
            age: Some(45),
        }),
        department: "Cardiology".to_string(),
        room: Some("Room 101".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
        visit_type: None,
        notes: None,
    }
}

async fn app_for(user: &TestUser) -> Router {
    let mut board = ScheduleBoard::new();
    board.add(slot("S001", "D001", 20, 9)).unwrap();
    board.add(slot("S002", "D002", 3, 11)).unwrap();

    let sessions = signed_in(user).await;
    create_schedule_router(Arc::new(ScheduleCellState::new(sessions, board, 3)))
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
async fn doctors_read_but_do_not_edit() {
    let app = app_for(&TestUser::doctor()).await;

    let (status, body) = send(app.clone(), "GET", "/?doctor=D001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filtered"], 1);
    assert_eq!(body["total"], 2);

    let (status, _) = send(app, "DELETE", "/S001", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn patients_cannot_see_schedules() {
    let app = app_for(&TestUser::patient()).await;
    let (status, _) = send(app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn double_booking_a_doctor_conflicts() {
    let app = app_for(&TestUser::receptionist()).await;

    let request = serde_json::to_value(slot("S003", "D001", 20, 9)).unwrap();
    let (status, _) = send(app.clone(), "POST", "/", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let request = serde_json::to_value(slot("S003", "D001", 20, 10)).unwrap();
    let (status, body) = send(app, "POST", "/", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slot_key"], "2024-06-20T10:00:00/D001");
    assert_eq!(body["slot"]["status"], "scheduled");
}

#[tokio::test]
async fn slot_lifecycle() {
    let app = app_for(&TestUser::staff()).await;

    let (_, body) = send(app.clone(), "GET", "/S001", None).await;
    assert_eq!(body["available_actions"], json!(["confirm", "start", "cancel"]));

    let (status, body) = send(app.clone(), "POST", "/S001/actions", Some(json!({"action": "start"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slot"]["status"], "in-progress");

    let (_, body) = send(app.clone(), "POST", "/S001/actions", Some(json!({"action": "complete"}))).await;
    assert_eq!(body["slot"]["status"], "completed");
    assert!(body["slot"]["completed_at"].is_string());

    let (status, _) = send(app, "POST", "/S002/actions", Some(json!({"action": "no-show"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn calendar_for_one_department() {
    let app = app_for(&TestUser::admin()).await;

    let (status, body) = send(app.clone(), "GET", "/calendar?year=2024&month=6&department=Cardiology", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calendar"]["cells"][6 + 2]["total"], 1);
    assert_eq!(body["calendar"]["cells"][6 + 19]["total"], 1);

    let (_, body) = send(app, "GET", "/calendar?year=2024&month=12", None).await;
    assert_eq!(body["next"], json!({"year": 2025, "month": 1}));
}
