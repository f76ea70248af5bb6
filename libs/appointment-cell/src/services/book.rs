// libs/appointment-cell/src/services/book.rs
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use visit_cell::{
    apply_action, build_month_grid, ensure_admitted, Appointment, CalendarGrid, MonthView, Transition,
    Visit, VisitAction, VisitError, VisitFilter,
};

use crate::models::UpdateAppointmentRequest;

/// Appointments as last fetched from the booking service, plus local edits.
#[derive(Debug, Clone, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Result<Self, VisitError> {
        let mut seen = HashSet::new();
        for appointment in &appointments {
            if !seen.insert(appointment.id.clone()) {
                return Err(VisitError::DuplicateId(appointment.id.clone()));
            }
            ensure_admitted(Appointment::CONTEXT, appointment.status)?;
        }

        info!("Appointment book loaded with {} appointments", appointments.len());
        Ok(Self { appointments })
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn list(&self, filter: &VisitFilter) -> Vec<Appointment> {
        filter.apply(&self.appointments)
    }

    /// Same as `list`, narrowed to one patient when `patient_id` is set.
    pub fn list_for(&self, filter: &VisitFilter, patient_id: Option<&str>) -> Vec<Appointment> {
        let mut appointments = self.list(filter);
        if let Some(patient_id) = patient_id {
            appointments.retain(|a| a.patient.id == patient_id);
        }
        appointments
    }

    pub fn get(&self, id: &str) -> Result<&Appointment, VisitError> {
        self.appointments
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| VisitError::NotFound(id.to_string()))
    }

    fn position(&self, id: &str) -> Result<usize, VisitError> {
        self.appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| VisitError::NotFound(id.to_string()))
    }

    pub fn insert(&mut self, appointment: Appointment) -> Result<Appointment, VisitError> {
        if self.appointments.iter().any(|a| a.id == appointment.id) {
            return Err(VisitError::DuplicateId(appointment.id));
        }
        ensure_admitted(Appointment::CONTEXT, appointment.status)?;

        info!(
            "Booked {} with {} on {} at {}",
            appointment.patient.name, appointment.doctor.name, appointment.date, appointment.start_time
        );
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    /// Records an appointment the backend has already accepted.
    pub fn record_booking(&mut self, appointment: Appointment) -> Result<Appointment, VisitError> {
        let id = appointment.id.clone();
        self.insert(appointment).inspect_err(|e| {
            error!("Backend accepted booking {} but the local book refused it: {}", id, e);
        })
    }

    pub fn update(&mut self, id: &str, request: UpdateAppointmentRequest) -> Result<Appointment, VisitError> {
        let index = self.position(id)?;
        let current = &self.appointments[index];

        if request.reschedules() && current.status.is_terminal() {
            warn!("Refusing to reschedule {} appointment {}", current.status, id);
            return Err(VisitError::Validation(format!(
                "cannot reschedule an appointment that is {}",
                current.status
            )));
        }

        let start_time = request.start_time.unwrap_or(current.start_time);
        let end_time = request.end_time.unwrap_or(current.end_time);
        if start_time >= end_time {
            return Err(VisitError::Validation("start time must be before end time".to_string()));
        }

        let appointment = &mut self.appointments[index];
        appointment.start_time = start_time;
        appointment.end_time = end_time;
        if let Some(date) = request.date {
            appointment.date = date;
        }
        if let Some(doctor) = request.doctor {
            appointment.doctor = doctor;
        }
        if let Some(department) = request.department {
            appointment.department = department;
        }
        if let Some(room) = request.room {
            appointment.room = Some(room);
        }
        if let Some(visit_type) = request.visit_type {
            appointment.visit_type = visit_type;
        }
        if let Some(notes) = request.notes {
            appointment.notes = Some(notes);
        }

        debug!("Updated appointment {}", id);
        Ok(appointment.clone())
    }

    pub fn remove(&mut self, id: &str) -> Result<Appointment, VisitError> {
        let index = self.position(id)?;
        let removed = self.appointments.remove(index);
        info!("Removed appointment {}", removed.id);
        Ok(removed)
    }

    pub fn apply(
        &mut self,
        id: &str,
        action: VisitAction,
        now: DateTime<Utc>,
    ) -> Result<(Appointment, Transition), VisitError> {
        let index = self.position(id)?;
        let appointment = &mut self.appointments[index];
        let transition = apply_action(appointment, action, now)?;
        Ok((appointment.clone(), transition))
    }

    /// Month grid over the filtered appointments.
    pub fn calendar(
        &self,
        view: MonthView,
        filter: &VisitFilter,
        patient_id: Option<&str>,
        per_cell_limit: usize,
    ) -> CalendarGrid<Appointment> {
        let appointments = self.list_for(filter, patient_id);
        build_month_grid(view, &appointments, per_cell_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use visit_cell::{DoctorRef, FilterKey, PatientRef, VisitStatus, VisitType};

    fn appointment(id: &str, patient_id: &str, day: u32, status: VisitStatus) -> Appointment {
        Appointment {
            id: id.to_string(),
            patient: PatientRef {
                id: patient_id.to_string(),
                name: format!("Patient {}", patient_id),
                phone: "+1 555 000 0000".to_string(),
                age: None,
            },
            doctor: DoctorRef { id: "D001".to_string(), name: "Dr. Sarah Wilson".to_string() },
            department: "Cardiology".to_string(),
            room: None,
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            visit_type: VisitType::Consultation,
            status,
            started_at: None,
            completed_at: None,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        }
    }

    fn book() -> AppointmentBook {
        AppointmentBook::with_appointments(vec![
            appointment("APT001", "P001", 20, VisitStatus::Scheduled),
            appointment("APT002", "P002", 20, VisitStatus::Confirmed),
            appointment("APT003", "P001", 21, VisitStatus::Completed),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_queue_only_statuses() {
        let result = AppointmentBook::with_appointments(vec![appointment("APT001", "P001", 20, VisitStatus::Waiting)]);
        assert_matches!(result, Err(VisitError::StatusNotInContext { .. }));
    }

    #[test]
    fn patient_scope_narrows_the_list() {
        let book = book();
        assert_eq!(book.list_for(&VisitFilter::new(), None).len(), 3);

        let own = book.list_for(&VisitFilter::new(), Some("P001"));
        assert_eq!(own.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["APT001", "APT003"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut book = book();
        let result = book.insert(appointment("APT002", "P003", 22, VisitStatus::Scheduled));
        assert_matches!(result, Err(VisitError::DuplicateId(id)) if id == "APT002");
    }

    #[test]
    fn recorded_booking_with_known_id_leaves_book_untouched() {
        let mut book = book();
        let result = book.record_booking(appointment("APT001", "P009", 23, VisitStatus::Scheduled));
        assert_matches!(result, Err(VisitError::DuplicateId(_)));
        assert_eq!(book.appointments().len(), 3);
        assert_eq!(book.get("APT001").unwrap().patient.id, "P001");

        let recorded = book.record_booking(appointment("APT004", "P009", 23, VisitStatus::Scheduled)).unwrap();
        assert_eq!(recorded.id, "APT004");
        assert_eq!(book.appointments().len(), 4);
    }

    #[test]
    fn completed_appointments_cannot_be_rescheduled() {
        let mut book = book();
        let request = UpdateAppointmentRequest {
            date: NaiveDate::from_ymd_opt(2024, 6, 25),
            ..Default::default()
        };
        assert_matches!(book.update("APT003", request), Err(VisitError::Validation(_)));

        let notes_only = UpdateAppointmentRequest {
            notes: Some("follow-up booked".to_string()),
            ..Default::default()
        };
        assert!(book.update("APT003", notes_only).is_ok());
    }

    #[test]
    fn update_keeps_start_before_end() {
        let mut book = book();
        let request = UpdateAppointmentRequest {
            start_time: NaiveTime::from_hms_opt(10, 0, 0),
            ..Default::default()
        };
        assert_matches!(book.update("APT001", request), Err(VisitError::Validation(_)));
        assert_eq!(book.get("APT001").unwrap().start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn confirm_then_start() {
        let mut book = book();
        let now = Utc.with_ymd_and_hms(2024, 6, 20, 9, 2, 0).unwrap();

        let (confirmed, _) = book.apply("APT001", VisitAction::Confirm, now).unwrap();
        assert_eq!(confirmed.status, VisitStatus::Confirmed);

        let (started, transition) = book.apply("APT001", VisitAction::Start, now).unwrap();
        assert_eq!(started.status, VisitStatus::InProgress);
        assert_eq!(started.started_at, Some(now));
        assert_eq!(transition.from, VisitStatus::Confirmed);
    }

    #[test]
    fn calendar_groups_by_day() {
        let book = book();
        let view = MonthView::new(2024, 6).unwrap();
        let filter = VisitFilter::new().with_select(FilterKey::Status, Some("all"));

        let grid = book.calendar(view, &filter, None, 1);
        let day = grid.day(20).unwrap();
        assert_eq!(day.total, 2);
        assert_eq!(day.records.len(), 1);
        assert_eq!(day.overflow, 1);
        assert_eq!(grid.day(21).unwrap().total, 1);
    }
}
