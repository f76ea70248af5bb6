use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use visit_cell::{DoctorRef, FilterKey, PatientRef, VisitAction, VisitFilter, VisitType};

/// A new slot on a doctor's schedule. `patient` stays empty for open slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddScheduleSlotRequest {
    pub id: Option<String>,
    pub doctor: DoctorRef,
    pub patient: Option<PatientRef>,
    pub department: String,
    pub room: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub visit_type: Option<VisitType>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleSlotRequest {
    pub patient: Option<PatientRef>,
    pub department: Option<String>,
    pub room: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub visit_type: Option<VisitType>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleActionRequest {
    pub action: VisitAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub visit_type: Option<String>,
    pub department: Option<String>,
    pub doctor: Option<String>,
}

impl ScheduleQuery {
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
pub struct ScheduleCalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub doctor: Option<String>,
    pub department: Option<String>,
}
