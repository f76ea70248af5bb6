// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_http::ApiClient;
use shared_utils::validation::mask_card;
use visit_cell::{Appointment, Visit};

use crate::models::{AppointmentError, PaymentReceipt, PaymentRequest, PaymentStatus, ValidatedBooking};

/// I/O boundary for the appointment screens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, AppointmentError>;

    async fn submit_booking(&self, booking: &ValidatedBooking) -> Result<Appointment, AppointmentError>;

    async fn process_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt, AppointmentError>;
}

pub fn new_appointment(booking: &ValidatedBooking, id: String) -> Appointment {
    Appointment {
        id,
        patient: booking.patient.clone(),
        doctor: booking.doctor.clone(),
        department: booking.department.clone(),
        room: booking.room.clone(),
        date: booking.date,
        start_time: booking.start_time,
        end_time: booking.end_time,
        visit_type: booking.visit_type,
        status: Appointment::CONTEXT.initial_status(),
        started_at: None,
        completed_at: None,
        notes: booking.notes.clone(),
        created_at: Utc::now(),
    }
}

// ==============================================================================
// SIMULATED BACKEND
// ==============================================================================

/// In-memory backend that answers after a fixed delay and never fails.
pub struct SimulatedBookingService {
    latency: Duration,
    appointments: RwLock<Vec<Appointment>>,
    receipts: RwLock<Vec<PaymentReceipt>>,
}

impl SimulatedBookingService {
    pub fn new(seed: Vec<Appointment>, latency: Duration) -> Self {
        Self {
            latency,
            appointments: RwLock::new(seed),
            receipts: RwLock::new(Vec::new()),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn receipts(&self) -> Vec<PaymentReceipt> {
        self.receipts.read().await.clone()
    }
}

#[async_trait]
impl BookingService for SimulatedBookingService {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        self.simulate_latency().await;
        Ok(self.appointments.read().await.clone())
    }

    async fn submit_booking(&self, booking: &ValidatedBooking) -> Result<Appointment, AppointmentError> {
        self.simulate_latency().await;

        let appointment = new_appointment(booking, format!("APT-{}", Uuid::new_v4().simple()));
        self.appointments.write().await.push(appointment.clone());

        info!("Simulated booking {} for {} on {}", appointment.id, appointment.patient.name, appointment.date);
        Ok(appointment)
    }

    async fn process_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt, AppointmentError> {
        self.simulate_latency().await;

        let receipt = PaymentReceipt {
            receipt_id: format!("RCPT-{}", Uuid::new_v4().simple()),
            appointment_id: request.appointment_id.clone(),
            amount_cents: request.amount_cents,
            method: request.method,
            masked_card: request.card_number.as_deref().map(mask_card),
            status: PaymentStatus::Paid,
            processed_at: Utc::now(),
        };
        self.receipts.write().await.push(receipt.clone());

        info!("Simulated {} payment of {} cents for {}", receipt.method, receipt.amount_cents, receipt.appointment_id);
        Ok(receipt)
    }
}

// ==============================================================================
// HTTP BACKEND
// ==============================================================================

pub struct HttpBookingService {
    client: ApiClient,
}

impl HttpBookingService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: ApiClient::new(base_url),
        }
    }
}

#[async_trait]
impl BookingService for HttpBookingService {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching appointments from {}", self.client.base_url());
        Ok(self.client.get("/appointments").await?)
    }

    async fn submit_booking(&self, booking: &ValidatedBooking) -> Result<Appointment, AppointmentError> {
        Ok(self.client.post("/appointments", json!(booking)).await?)
    }

    async fn process_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt, AppointmentError> {
        // card details go to the backend as entered; only receipts are masked
        Ok(self.client.post("/payments", json!(request)).await?)
    }
}

pub fn booking_service_from_config(config: &AppConfig, seed: Vec<Appointment>) -> Arc<dyn BookingService> {
    match &config.booking_api_url {
        Some(url) => {
            info!("Using booking backend at {}", url);
            Arc::new(HttpBookingService::new(url))
        }
        None => {
            info!("Using simulated booking backend ({} ms latency)", config.simulated_latency_ms);
            Arc::new(SimulatedBookingService::new(
                seed,
                Duration::from_millis(config.simulated_latency_ms),
            ))
        }
    }
}
