use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::{
    new_appointment, AppointmentError, BookingService, HttpBookingService, PaymentMethod, PaymentRequest,
    PaymentStatus, ValidatedBooking,
};
use visit_cell::{DoctorRef, PatientRef, VisitStatus, VisitType};

fn booking() -> ValidatedBooking {
    ValidatedBooking {
        patient: PatientRef {
            id: "P003".to_string(),
            name: "Michael Brown".to_string(),
            phone: "+1 555 987 6543".to_string(),
            age: Some(61),
        },
        doctor: DoctorRef { id: "D003".to_string(), name: "Dr. Emily Rodriguez".to_string() },
        department: "Orthopedics".to_string(),
        room: Some("Room 204".to_string()),
        date: NaiveDate::from_ymd_opt(2030, 3, 4).unwrap(),
        start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(14, 45, 0).unwrap(),
        visit_type: VisitType::Consultation,
        notes: None,
    }
}

#[tokio::test]
async fn fetches_appointments_from_backend() {
    let server = MockServer::start().await;
    let appointment = new_appointment(&booking(), "APT900".to_string());

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([appointment])))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpBookingService::new(&server.uri());
    let fetched = service.fetch_appointments().await.unwrap();
    assert_eq!(fetched, vec![appointment]);
}

#[tokio::test]
async fn submits_booking_as_json() {
    let server = MockServer::start().await;
    let created = new_appointment(&booking(), "APT901".to_string());

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_partial_json(json!({ "department": "Orthopedics", "date": "2030-03-04" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&server)
        .await;

    let service = HttpBookingService::new(&server.uri());
    let appointment = service.submit_booking(&booking()).await.unwrap();
    assert_eq!(appointment.id, "APT901");
    assert_eq!(appointment.status, VisitStatus::Scheduled);
}

#[tokio::test]
async fn posts_payments() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "receipt_id": "RCPT-1",
            "appointment_id": "APT901",
            "amount_cents": 5000,
            "method": "cash",
            "masked_card": null,
            "status": "pending",
            "processed_at": Utc::now()
        })))
        .mount(&server)
        .await;

    let service = HttpBookingService::new(&server.uri());
    let receipt = service
        .process_payment(&PaymentRequest {
            appointment_id: "APT901".to_string(),
            amount_cents: 5000,
            method: PaymentMethod::Cash,
            card_number: None,
            card_expiry: None,
            cardholder: None,
        })
        .await
        .unwrap();
    assert_eq!(receipt.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn backend_errors_become_service_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let service = HttpBookingService::new(&server.uri());
    let err = service.fetch_appointments().await.unwrap_err();
    assert!(matches!(err, AppointmentError::Service(_)));
}
