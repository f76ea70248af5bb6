use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use visit_cell::{
    apply_action, build_month_grid, ensure_admitted, CalendarGrid, MonthView, ScheduleSlot, Transition, Visit,
    VisitAction, VisitError, VisitFilter, VisitType,
};

use crate::models::{AddScheduleSlotRequest, UpdateScheduleSlotRequest};

/// Doctors' timetables. A doctor holds at most one slot per date and start time.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBoard {
    slots: Vec<ScheduleSlot>,
}

impl ScheduleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(slots: Vec<ScheduleSlot>) -> Result<Self, VisitError> {
        let mut ids = HashSet::new();
        let mut keys = HashSet::new();
        for slot in &slots {
            if !ids.insert(slot.id.clone()) {
                return Err(VisitError::DuplicateId(slot.id.clone()));
            }
            if !keys.insert(slot.slot_key()) {
                return Err(VisitError::DuplicateId(slot.slot_key()));
            }
            ensure_admitted(ScheduleSlot::CONTEXT, slot.status)?;
        }

        info!("Schedule board loaded with {} slots", slots.len());
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[ScheduleSlot] {
        &self.slots
    }

    /// Filtered slots ordered by date, then start time.
    pub fn list(&self, filter: &VisitFilter) -> Vec<ScheduleSlot> {
        let mut slots = filter.apply(&self.slots);
        slots.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        slots
    }

    pub fn get(&self, id: &str) -> Result<&ScheduleSlot, VisitError> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .ok_or_else(|| VisitError::NotFound(id.to_string()))
    }

    fn position(&self, id: &str) -> Result<usize, VisitError> {
        self.slots
            .iter()
            .position(|slot| slot.id == id)
            .ok_or_else(|| VisitError::NotFound(id.to_string()))
    }

    fn ensure_key_free(&self, key: &str, except_id: Option<&str>) -> Result<(), VisitError> {
        let taken = self
            .slots
            .iter()
            .any(|slot| Some(slot.id.as_str()) != except_id && slot.slot_key() == key);
        if taken {
            warn!("Slot {} is already on the schedule", key);
            return Err(VisitError::DuplicateId(key.to_string()));
        }
        Ok(())
    }

    pub fn add(&mut self, request: AddScheduleSlotRequest) -> Result<ScheduleSlot, VisitError> {
        if request.doctor.id.trim().is_empty() {
            return Err(VisitError::Validation("doctor is required".to_string()));
        }
        if request.start_time >= request.end_time {
            return Err(VisitError::Validation("start time must be before end time".to_string()));
        }

        let id = request
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("S-{}", &Uuid::new_v4().simple().to_string()[..8]));
        if self.slots.iter().any(|slot| slot.id == id) {
            return Err(VisitError::DuplicateId(id));
        }

        let slot = ScheduleSlot {
            id,
            doctor: request.doctor,
            patient: request.patient,
            department: request.department,
            room: request.room,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            visit_type: request.visit_type.unwrap_or(VisitType::Scheduled),
            status: ScheduleSlot::CONTEXT.initial_status(),
            started_at: None,
            completed_at: None,
            notes: request.notes,
        };
        self.ensure_key_free(&slot.slot_key(), None)?;

        info!("Added slot {} for {}", slot.slot_key(), slot.doctor.name);
        self.slots.push(slot.clone());
        Ok(slot)
    }

    pub fn update(&mut self, id: &str, request: UpdateScheduleSlotRequest) -> Result<ScheduleSlot, VisitError> {
        let index = self.position(id)?;

        let mut slot = self.slots[index].clone();
        if let Some(date) = request.date {
            slot.date = date;
        }
        if let Some(start_time) = request.start_time {
            slot.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            slot.end_time = end_time;
        }
        if slot.start_time >= slot.end_time {
            return Err(VisitError::Validation("start time must be before end time".to_string()));
        }
        self.ensure_key_free(&slot.slot_key(), Some(id))?;

        if let Some(patient) = request.patient {
            slot.patient = Some(patient);
        }
        if let Some(department) = request.department {
            slot.department = department;
        }
        if let Some(room) = request.room {
            slot.room = Some(room);
        }
        if let Some(visit_type) = request.visit_type {
            slot.visit_type = visit_type;
        }
        if let Some(notes) = request.notes {
            slot.notes = Some(notes);
        }

        debug!("Updated slot {}", id);
        self.slots[index] = slot.clone();
        Ok(slot)
    }

    pub fn remove(&mut self, id: &str) -> Result<ScheduleSlot, VisitError> {
        let index = self.position(id)?;
        let removed = self.slots.remove(index);
        info!("Removed slot {}", removed.slot_key());
        Ok(removed)
    }

    pub fn apply(
        &mut self,
        id: &str,
        action: VisitAction,
        now: DateTime<Utc>,
    ) -> Result<(ScheduleSlot, Transition), VisitError> {
        let index = self.position(id)?;
        let slot = &mut self.slots[index];
        let transition = apply_action(slot, action, now)?;
        Ok((slot.clone(), transition))
    }

    pub fn calendar(&self, view: MonthView, filter: &VisitFilter, per_cell_limit: usize) -> CalendarGrid<ScheduleSlot> {
        build_month_grid(view, &self.list(filter), per_cell_limit)
    }
}
