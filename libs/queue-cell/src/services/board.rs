use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use visit_cell::{
    apply_action, ensure_admitted, move_down, move_up, next_queue_number, renumber, Priority, QueueItem,
    Transition, Visit, VisitAction, VisitError, VisitFilter, VisitStatus, VisitType,
};

use crate::models::{AddQueueItemRequest, QueueStats, UpdateQueueItemRequest};

/// The waiting-room list. Order is the call order; staff change it by hand.
/// `queue_number` always equals the 1-based position.
#[derive(Debug, Clone, Default)]
pub struct QueueBoard {
    items: Vec<QueueItem>,
}

impl QueueBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads items in the given order, renumbering them by position.
    pub fn with_items(mut items: Vec<QueueItem>) -> Result<Self, VisitError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.clone()) {
                return Err(VisitError::DuplicateId(item.id.clone()));
            }
            ensure_admitted(QueueItem::CONTEXT, item.status)?;
        }

        let changed = renumber(&mut items);
        if changed > 0 {
            warn!("Renumbered {} loaded queue items to match their positions", changed);
        }

        info!("Queue board loaded with {} items", items.len());
        Ok(Self { items })
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn list(&self, filter: &VisitFilter) -> Vec<QueueItem> {
        filter.apply(&self.items)
    }

    pub fn get(&self, id: &str) -> Result<&QueueItem, VisitError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| VisitError::NotFound(id.to_string()))
    }

    fn position(&self, id: &str) -> Result<usize, VisitError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| VisitError::NotFound(id.to_string()))
    }

    pub fn add(&mut self, request: AddQueueItemRequest, now: DateTime<Utc>) -> Result<QueueItem, VisitError> {
        if request.patient.name.trim().is_empty() {
            return Err(VisitError::Validation("patient name is required".to_string()));
        }
        if request.department.trim().is_empty() {
            return Err(VisitError::Validation("department is required".to_string()));
        }

        let id = request
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("Q-{}", &Uuid::new_v4().simple().to_string()[..8]));
        if self.items.iter().any(|item| item.id == id) {
            return Err(VisitError::DuplicateId(id));
        }

        let item = QueueItem {
            id,
            queue_number: next_queue_number(&self.items),
            patient: request.patient,
            doctor: request.doctor,
            department: request.department,
            room: request.room,
            visit_type: request.visit_type.unwrap_or(VisitType::WalkIn),
            priority: request.priority.unwrap_or_default(),
            status: QueueItem::CONTEXT.initial_status(),
            checked_in_at: now,
            called_at: None,
            started_at: None,
            completed_at: None,
            estimated_wait_minutes: request.estimated_wait_minutes,
            notes: request.notes,
        };

        info!("Checked in {} as queue #{}", item.patient.name, item.queue_number);
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn update(&mut self, id: &str, request: UpdateQueueItemRequest) -> Result<QueueItem, VisitError> {
        let index = self.position(id)?;
        let item = &mut self.items[index];

        if let Some(patient) = request.patient {
            item.patient = patient;
        }
        if let Some(doctor) = request.doctor {
            item.doctor = doctor;
        }
        if let Some(department) = request.department {
            item.department = department;
        }
        if let Some(room) = request.room {
            item.room = Some(room);
        }
        if let Some(visit_type) = request.visit_type {
            item.visit_type = visit_type;
        }
        if let Some(priority) = request.priority {
            item.priority = priority;
        }
        if let Some(minutes) = request.estimated_wait_minutes {
            item.estimated_wait_minutes = Some(minutes);
        }
        if let Some(notes) = request.notes {
            item.notes = Some(notes);
        }

        debug!("Updated queue item {}", id);
        Ok(item.clone())
    }

    /// Removes the item and closes the gap in the numbering.
    pub fn remove(&mut self, id: &str) -> Result<QueueItem, VisitError> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        let shifted = renumber(&mut self.items);
        info!("Removed {} from the queue, {} moved up", removed.id, shifted);
        Ok(removed)
    }

    pub fn apply(
        &mut self,
        id: &str,
        action: VisitAction,
        now: DateTime<Utc>,
    ) -> Result<(QueueItem, Transition), VisitError> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        let transition = apply_action(item, action, now)?;
        Ok((item.clone(), transition))
    }

    pub fn move_up(&mut self, id: &str) -> Result<bool, VisitError> {
        let index = self.position(id)?;
        Ok(move_up(&mut self.items, index))
    }

    pub fn move_down(&mut self, id: &str) -> Result<bool, VisitError> {
        let index = self.position(id)?;
        Ok(move_down(&mut self.items, index))
    }

    pub fn stats(&self) -> QueueStats {
        let count = |status: VisitStatus| self.items.iter().filter(|i| i.status == status).count();

        let waits: Vec<i64> = self.items.iter().filter_map(QueueItem::wait_minutes).collect();
        let average_wait_minutes = if waits.is_empty() {
            None
        } else {
            Some(waits.iter().sum::<i64>() as f64 / waits.len() as f64)
        };

        QueueStats {
            total: self.items.len(),
            waiting: count(VisitStatus::Waiting),
            called: count(VisitStatus::Called),
            in_progress: count(VisitStatus::InProgress),
            completed: count(VisitStatus::Completed),
            cancelled: count(VisitStatus::Cancelled),
            no_show: count(VisitStatus::NoShow),
            urgent_waiting: self
                .items
                .iter()
                .filter(|i| i.status == VisitStatus::Waiting && i.priority == Priority::Urgent)
                .count(),
            average_wait_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};
    use visit_cell::{DoctorRef, PatientRef};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 9, 0, 0).unwrap()
    }

    fn request(name: &str) -> AddQueueItemRequest {
        AddQueueItemRequest {
            id: None,
            patient: PatientRef {
                id: format!("P-{}", name),
                name: name.to_string(),
                phone: "+1 555 123 4567".to_string(),
                age: Some(30),
            },
            doctor: DoctorRef { id: "D001".to_string(), name: "Dr. Sarah Wilson".to_string() },
            department: "Cardiology".to_string(),
            room: None,
            visit_type: None,
            priority: None,
            estimated_wait_minutes: None,
            notes: None,
        }
    }

    fn board_of(names: &[&str]) -> QueueBoard {
        let mut board = QueueBoard::new();
        for name in names {
            board.add(request(name), now()).unwrap();
        }
        board
    }

    #[test]
    fn add_numbers_sequentially_and_starts_waiting() {
        let board = board_of(&["Alice", "Bob"]);
        let numbers: Vec<u32> = board.items().iter().map(|i| i.queue_number).collect();
        assert_eq!(numbers, [1, 2]);
        assert!(board.items().iter().all(|i| i.status == VisitStatus::Waiting));
        assert_eq!(board.items()[0].visit_type, VisitType::WalkIn);
        assert_eq!(board.items()[0].priority, Priority::Normal);
    }

    #[test]
    fn add_rejects_duplicates_and_blank_names() {
        let mut board = QueueBoard::new();
        let mut first = request("Alice");
        first.id = Some("Q001".to_string());
        board.add(first.clone(), now()).unwrap();

        assert_matches!(board.add(first, now()), Err(VisitError::DuplicateId(_)));
        assert_matches!(board.add(request("  "), now()), Err(VisitError::Validation(_)));
    }

    #[test]
    fn with_items_checks_ids_and_statuses() {
        let board = board_of(&["Alice"]);
        let mut items = board.items().to_vec();
        items.push(items[0].clone());
        assert_matches!(QueueBoard::with_items(items), Err(VisitError::DuplicateId(_)));

        let mut items = board.items().to_vec();
        items[0].status = VisitStatus::Scheduled;
        assert_matches!(QueueBoard::with_items(items), Err(VisitError::StatusNotInContext { .. }));
    }

    #[test]
    fn move_up_by_id() {
        let mut board = board_of(&["Alice", "Bob"]);
        let bob = board.items()[1].id.clone();

        assert!(board.move_up(&bob).unwrap());
        assert_eq!(board.items()[0].patient.name, "Bob");
        assert_eq!(board.items()[0].queue_number, 1);
        assert!(!board.move_up(&bob).unwrap());
        assert_matches!(board.move_down("missing"), Err(VisitError::NotFound(_)));
    }

    #[test]
    fn urgent_priority_does_not_reorder() {
        let mut board = board_of(&["Alice"]);
        let mut urgent = request("Bob");
        urgent.priority = Some(Priority::Urgent);
        board.add(urgent, now()).unwrap();

        assert_eq!(board.items()[1].patient.name, "Bob");
        assert_eq!(board.stats().urgent_waiting, 1);
    }

    #[test]
    fn stats_average_wait_of_called_items() {
        let mut board = board_of(&["Alice", "Bob", "Carol"]);
        let ids: Vec<String> = board.items().iter().map(|i| i.id.clone()).collect();

        board.apply(&ids[0], VisitAction::Call, now() + Duration::minutes(10)).unwrap();
        board.apply(&ids[1], VisitAction::Call, now() + Duration::minutes(20)).unwrap();
        board.apply(&ids[1], VisitAction::Complete, now() + Duration::minutes(40)).unwrap();

        let stats = board.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.waiting, 1);
        assert_eq!(stats.called, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.average_wait_minutes, Some(15.0));
    }

    #[test]
    fn update_never_touches_status() {
        let mut board = board_of(&["Alice"]);
        let id = board.items()[0].id.clone();

        let updated = board
            .update(&id, UpdateQueueItemRequest {
                priority: Some(Priority::High),
                notes: Some("needs wheelchair".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, VisitStatus::Waiting);
    }

    #[test]
    fn remove_closes_the_gap() {
        let mut board = board_of(&["Alice", "Bob", "Carol"]);
        let bob = board.items()[1].id.clone();

        board.remove(&bob).unwrap();
        let numbers: Vec<u32> = board.items().iter().map(|i| i.queue_number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(board.items()[1].patient.name, "Carol");
        assert_eq!(next_queue_number(board.items()), 3);
        assert_matches!(board.get(&bob), Err(VisitError::NotFound(_)));
    }

    #[test]
    fn swap_after_removal_keeps_numbers_a_permutation() {
        let mut board = board_of(&["Alice", "Bob", "Carol", "Dave"]);
        let alice = board.items()[0].id.clone();
        let carol = board.items()[2].id.clone();
        board.remove(&alice).unwrap();

        let before: Vec<u32> = board.items().iter().map(|i| i.queue_number).collect();
        assert!(board.move_down(&carol).unwrap());
        let after: Vec<u32> = board.items().iter().map(|i| i.queue_number).collect();

        assert_eq!(before.iter().sum::<u32>(), after.iter().sum::<u32>());
        assert_eq!(after, [1, 2, 3]);
        let names: Vec<&str> = board.items().iter().map(|i| i.patient.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Dave", "Carol"]);
    }

    #[test]
    fn with_items_normalizes_numbering() {
        let mut items = board_of(&["Alice", "Bob"]).items().to_vec();
        items[0].queue_number = 4;
        items[1].queue_number = 4;

        let board = QueueBoard::with_items(items).unwrap();
        let numbers: Vec<u32> = board.items().iter().map(|i| i.queue_number).collect();
        assert_eq!(numbers, [1, 2]);
    }
}
