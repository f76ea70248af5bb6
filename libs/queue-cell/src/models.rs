use serde::{Deserialize, Serialize};

use visit_cell::{DoctorRef, FilterKey, PatientRef, Priority, VisitAction, VisitFilter, VisitType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddQueueItemRequest {
    pub id: Option<String>,
    pub patient: PatientRef,
    pub doctor: DoctorRef,
    pub department: String,
    pub room: Option<String>,
    pub visit_type: Option<VisitType>,
    pub priority: Option<Priority>,
    pub estimated_wait_minutes: Option<u32>,
    pub notes: Option<String>,
}

/// Direct field edit. Status is never edited here, only through actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQueueItemRequest {
    pub patient: Option<PatientRef>,
    pub doctor: Option<DoctorRef>,
    pub department: Option<String>,
    pub room: Option<String>,
    pub visit_type: Option<VisitType>,
    pub priority: Option<Priority>,
    pub estimated_wait_minutes: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueActionRequest {
    pub action: VisitAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub visit_type: Option<String>,
    pub department: Option<String>,
    pub doctor: Option<String>,
}

impl QueueQuery {
    pub fn to_filter(&self) -> VisitFilter {
        VisitFilter::new()
            .with_search(self.search.clone().unwrap_or_default())
            .with_select(FilterKey::Status, self.status.clone())
            .with_select(FilterKey::Priority, self.priority.clone())
            .with_select(FilterKey::VisitType, self.visit_type.clone())
            .with_select(FilterKey::Department, self.department.clone())
            .with_select(FilterKey::Doctor, self.doctor.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total: usize,
    pub waiting: usize,
    pub called: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub no_show: usize,
    pub urgent_waiting: usize,
    pub average_wait_minutes: Option<f64>,
}
