// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use shared_models::error::AppError;
use visit_cell::{DoctorRef, FilterKey, PatientRef, VisitAction, VisitError, VisitFilter, VisitType};

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

/// Raw booking form. `date` is kept as typed so it can be validated like the chat flow does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient: PatientRef,
    pub doctor: DoctorRef,
    pub department: String,
    pub room: Option<String>,
    pub date: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub visit_type: Option<VisitType>,
    pub notes: Option<String>,
}

/// A booking that passed form validation, ready for the booking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedBooking {
    pub patient: PatientRef,
    pub doctor: DoctorRef,
    pub department: String,
    pub room: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub visit_type: VisitType,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub doctor: Option<DoctorRef>,
    pub department: Option<String>,
    pub room: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub visit_type: Option<VisitType>,
    pub notes: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn reschedules(&self) -> bool {
        self.date.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentActionRequest {
    pub action: VisitAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub visit_type: Option<String>,
    pub department: Option<String>,
    pub doctor: Option<String>,
}

impl AppointmentQuery {
    pub fn to_filter(&self) -> VisitFilter {
        VisitFilter::new()
            .with_search(self.search.clone().unwrap_or_default())
            .with_select(FilterKey::Status, self.status.clone())
            .with_select(FilterKey::VisitType, self.visit_type.clone())
            .with_select(FilterKey::Department, self.department.clone())
            .with_select(FilterKey::Doctor, self.doctor.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub doctor: Option<String>,
    pub status: Option<String>,
}

// ==============================================================================
// PAYMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Card,
    Cash,
    Insurance,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Insurance => write!(f, "insurance"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub appointment_id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    pub cardholder: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub receipt_id: String,
    pub appointment_id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub masked_card: Option<String>,
    pub status: PaymentStatus,
    pub processed_at: DateTime<Utc>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error(transparent)]
    Visit(#[from] VisitError),

    #[error("Invalid booking: {0}")]
    InvalidBooking(String),

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Booking service error: {0}")]
    Service(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::Visit(e) => e.into(),
            AppointmentError::InvalidBooking(_) | AppointmentError::PaymentDeclined(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::Service(_) => AppError::ExternalService(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        AppointmentError::Service(err.to_string())
    }
}
