// libs/appointment-cell/src/services/intake.rs
use chrono::NaiveDate;
use tracing::debug;

use shared_utils::validation::{summarize, FormValidator, ValidationIssue};
use visit_cell::VisitType;

use crate::models::{AppointmentError, BookAppointmentRequest, PaymentMethod, PaymentRequest, ValidatedBooking};

/// Booking form checks: name, phone, ISO date not in the past, start before end.
pub fn validate_booking(
    validator: &FormValidator,
    request: &BookAppointmentRequest,
    today: NaiveDate,
) -> Result<ValidatedBooking, AppointmentError> {
    let mut issues = Vec::new();

    issues.extend(validator.check_required("patient name", &request.patient.name));
    issues.extend(validator.check_phone(&request.patient.phone));
    issues.extend(validator.check_required("doctor", &request.doctor.id));
    issues.extend(validator.check_required("department", &request.department));
    issues.extend(validator.check_time_range(request.start_time, request.end_time));

    let date = match validator.parse_date(&request.date) {
        Ok(date) => {
            issues.extend(validator.check_not_past(date, today));
            Some(date)
        }
        Err(issue) => {
            issues.push(issue);
            None
        }
    };

    match date {
        Some(date) if issues.is_empty() => Ok(ValidatedBooking {
            patient: request.patient.clone(),
            doctor: request.doctor.clone(),
            department: request.department.trim().to_string(),
            room: request.room.clone(),
            date,
            start_time: request.start_time,
            end_time: request.end_time,
            visit_type: request.visit_type.unwrap_or(VisitType::Consultation),
            notes: request.notes.clone(),
        }),
        _ => {
            debug!("Booking rejected with {} issue(s)", issues.len());
            Err(AppointmentError::InvalidBooking(summarize(&issues)))
        }
    }
}

/// Amount must be positive; cards need a valid number and an unexpired `MM/YY`.
pub fn validate_payment(
    validator: &FormValidator,
    request: &PaymentRequest,
    today: NaiveDate,
) -> Result<(), AppointmentError> {
    let mut issues: Vec<ValidationIssue> = Vec::new();
    issues.extend(validator.check_amount(request.amount_cents));

    if request.method == PaymentMethod::Card {
        match (&request.card_number, &request.card_expiry) {
            (Some(number), Some(expiry)) => issues.extend(validator.check_card(number, expiry, today)),
            (None, _) => issues.push(ValidationIssue::Required { field: "card number".to_string() }),
            (_, None) => issues.push(ValidationIssue::Required { field: "card expiry".to_string() }),
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppointmentError::PaymentDeclined(summarize(&issues)))
    }
}
