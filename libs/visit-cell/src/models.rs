// libs/visit-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// STATUS VOCABULARY
// ==============================================================================

/// Every status a visit can be in, across queue, appointment and schedule screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitStatus {
    Scheduled,
    Confirmed,
    Waiting,
    Called,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "scheduled",
            VisitStatus::Confirmed => "confirmed",
            VisitStatus::Waiting => "waiting",
            VisitStatus::Called => "called",
            VisitStatus::InProgress => "in-progress",
            VisitStatus::Completed => "completed",
            VisitStatus::Cancelled => "cancelled",
            VisitStatus::NoShow => "no-show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VisitStatus::Completed | VisitStatus::Cancelled | VisitStatus::NoShow)
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which screen a record belongs to. Each context admits a subset of [`VisitStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitContext {
    Queue,
    Appointment,
    Schedule,
}

impl VisitContext {
    pub fn vocabulary(&self) -> &'static [VisitStatus] {
        use VisitStatus::*;
        match self {
            VisitContext::Queue => &[Waiting, Called, InProgress, Completed, Cancelled, NoShow],
            VisitContext::Appointment => &[Scheduled, Confirmed, InProgress, Completed, Cancelled, NoShow],
            VisitContext::Schedule => &[Scheduled, Confirmed, InProgress, Completed, Cancelled],
        }
    }

    pub fn admits(&self, status: VisitStatus) -> bool {
        self.vocabulary().contains(&status)
    }

    /// Status a freshly created record starts in.
    pub fn initial_status(&self) -> VisitStatus {
        match self {
            VisitContext::Queue => VisitStatus::Waiting,
            VisitContext::Appointment | VisitContext::Schedule => VisitStatus::Scheduled,
        }
    }
}

impl fmt::Display for VisitContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitContext::Queue => write!(f, "queue"),
            VisitContext::Appointment => write!(f, "appointment"),
            VisitContext::Schedule => write!(f, "schedule"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitType {
    Consultation,
    FollowUp,
    Emergency,
    Scheduled,
    WalkIn,
}

impl VisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Consultation => "consultation",
            VisitType::FollowUp => "follow-up",
            VisitType::Emergency => "emergency",
            VisitType::Scheduled => "scheduled",
            VisitType::WalkIn => "walk-in",
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue priority. Only drives the badge; it never reorders the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// REFERENCES
// ==============================================================================

/// Denormalized copy of the patient, not a key into a patient store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRef {
    pub id: String,
    pub name: String,
}

// ==============================================================================
// ENTITY RECORDS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub queue_number: u32,
    pub patient: PatientRef,
    pub doctor: DoctorRef,
    pub department: String,
    pub room: Option<String>,
    pub visit_type: VisitType,
    pub priority: Priority,
    pub status: VisitStatus,
    pub checked_in_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_wait_minutes: Option<u32>,
    pub notes: Option<String>,
}

impl QueueItem {
    /// Minutes between check-in and being called, if called.
    pub fn wait_minutes(&self) -> Option<i64> {
        self.called_at.map(|called| (called - self.checked_in_at).num_minutes())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient: PatientRef,
    pub doctor: DoctorRef,
    pub department: String,
    pub room: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub visit_type: VisitType,
    pub status: VisitStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: String,
    pub doctor: DoctorRef,
    pub patient: Option<PatientRef>,
    pub department: String,
    pub room: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub visit_type: VisitType,
    pub status: VisitStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl ScheduleSlot {
    /// Composite key: `2024-06-20T09:00:00/D001`.
    pub fn slot_key(&self) -> String {
        format!("{}T{}/{}", self.date, self.start_time, self.doctor.id)
    }
}

// ==============================================================================
// CAPABILITIES
// ==============================================================================

/// Timestamp written as the side effect of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stamp {
    CalledAt,
    StartedAt,
    CompletedAt,
}

/// A record whose status is driven by the shared transition table.
pub trait Visit {
    const CONTEXT: VisitContext;

    fn id(&self) -> &str;
    fn status(&self) -> VisitStatus;
    fn set_status(&mut self, status: VisitStatus);
    fn stamp(&mut self, stamp: Stamp, at: DateTime<Utc>);
}

impl Visit for QueueItem {
    const CONTEXT: VisitContext = VisitContext::Queue;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> VisitStatus {
        self.status
    }

    fn set_status(&mut self, status: VisitStatus) {
        self.status = status;
    }

    fn stamp(&mut self, stamp: Stamp, at: DateTime<Utc>) {
        match stamp {
            // never before check-in
            Stamp::CalledAt => self.called_at = Some(at.max(self.checked_in_at)),
            Stamp::StartedAt => self.started_at = Some(at),
            Stamp::CompletedAt => self.completed_at = Some(at),
        }
    }
}

impl Visit for Appointment {
    const CONTEXT: VisitContext = VisitContext::Appointment;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> VisitStatus {
        self.status
    }

    fn set_status(&mut self, status: VisitStatus) {
        self.status = status;
    }

    fn stamp(&mut self, stamp: Stamp, at: DateTime<Utc>) {
        match stamp {
            Stamp::CalledAt => {}
            Stamp::StartedAt => self.started_at = Some(at),
            Stamp::CompletedAt => self.completed_at = Some(at),
        }
    }
}

impl Visit for ScheduleSlot {
    const CONTEXT: VisitContext = VisitContext::Schedule;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> VisitStatus {
        self.status
    }

    fn set_status(&mut self, status: VisitStatus) {
        self.status = status;
    }

    fn stamp(&mut self, stamp: Stamp, at: DateTime<Utc>) {
        match stamp {
            Stamp::CalledAt => {}
            Stamp::StartedAt => self.started_at = Some(at),
            Stamp::CompletedAt => self.completed_at = Some(at),
        }
    }
}

/// Select filters a list screen can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Status,
    VisitType,
    Priority,
    Department,
    Doctor,
}

/// A record the list screens can search and filter.
pub trait Filterable {
    /// Fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// Value compared against a select filter; `None` when the record has no such facet.
    fn facet(&self, key: FilterKey) -> Option<String>;
}

impl Filterable for QueueItem {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.patient.name.as_str(),
            self.id.as_str(),
            self.doctor.name.as_str(),
            self.department.as_str(),
        ];
        if let Some(room) = &self.room {
            fields.push(room.as_str());
        }
        fields
    }

    fn facet(&self, key: FilterKey) -> Option<String> {
        match key {
            FilterKey::Status => Some(self.status.to_string()),
            FilterKey::VisitType => Some(self.visit_type.to_string()),
            FilterKey::Priority => Some(self.priority.to_string()),
            FilterKey::Department => Some(self.department.clone()),
            FilterKey::Doctor => Some(self.doctor.id.clone()),
        }
    }
}

impl Filterable for Appointment {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.patient.name.as_str(),
            self.id.as_str(),
            self.doctor.name.as_str(),
            self.department.as_str(),
        ]
    }

    fn facet(&self, key: FilterKey) -> Option<String> {
        match key {
            FilterKey::Status => Some(self.status.to_string()),
            FilterKey::VisitType => Some(self.visit_type.to_string()),
            FilterKey::Priority => None,
            FilterKey::Department => Some(self.department.clone()),
            FilterKey::Doctor => Some(self.doctor.id.clone()),
        }
    }
}

impl Filterable for ScheduleSlot {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.doctor.name.as_str(), self.id.as_str(), self.department.as_str()];
        if let Some(patient) = &self.patient {
            fields.push(patient.name.as_str());
        }
        if let Some(room) = &self.room {
            fields.push(room.as_str());
        }
        fields
    }

    fn facet(&self, key: FilterKey) -> Option<String> {
        match key {
            FilterKey::Status => Some(self.status.to_string()),
            FilterKey::VisitType => Some(self.visit_type.to_string()),
            FilterKey::Priority => None,
            FilterKey::Department => Some(self.department.clone()),
            FilterKey::Doctor => Some(self.doctor.id.clone()),
        }
    }
}

/// A record that lands on a calendar day.
pub trait Dated {
    fn visit_date(&self) -> NaiveDate;
}

impl Dated for QueueItem {
    fn visit_date(&self) -> NaiveDate {
        self.checked_in_at.date_naive()
    }
}

impl Dated for Appointment {
    fn visit_date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for ScheduleSlot {
    fn visit_date(&self) -> NaiveDate {
        self.date
    }
}

/// A record that carries its own 1-based position.
pub trait Numbered {
    fn queue_number(&self) -> u32;
    fn set_queue_number(&mut self, number: u32);
}

impl Numbered for QueueItem {
    fn queue_number(&self) -> u32 {
        self.queue_number
    }

    fn set_queue_number(&mut self, number: u32) {
        self.queue_number = number;
    }
}
