// libs/visit-cell/tests/workflow_test.rs
use assert_matches::assert_matches;
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};

use visit_cell::*;

// ==============================================================================
// FIXTURES
// ==============================================================================

fn queue_item(number: u32, name: &str, status: VisitStatus) -> QueueItem {
    QueueItem {
        id: format!("Q{:03}", number),
        queue_number: number,
        patient: PatientRef {
            id: format!("P{:03}", number),
            name: name.to_string(),
            phone: "+1 555 010 0000".to_string(),
            age: Some(40),
        },
        doctor: DoctorRef {
            id: "D001".to_string(),
            name: "Dr. Sarah Wilson".to_string(),
        },
        department: "Cardiology".to_string(),
        room: Some("Room 101".to_string()),
        visit_type: VisitType::Consultation,
        priority: Priority::Normal,
        status,
        checked_in_at: Utc.with_ymd_and_hms(2024, 6, 20, 9, 0, 0).unwrap(),
        called_at: None,
        started_at: None,
        completed_at: None,
        estimated_wait_minutes: Some(15),
        notes: None,
    }
}

fn waiting_queue() -> Vec<QueueItem> {
    vec![
        queue_item(1, "John Smith", VisitStatus::Waiting),
        queue_item(2, "Emily Davis", VisitStatus::Waiting),
        queue_item(3, "Michael Brown", VisitStatus::Called),
        queue_item(4, "Sarah Johnson", VisitStatus::Completed),
    ]
}

// ==============================================================================
// TRANSITIONS
// ==============================================================================

#[test]
fn call_sets_called_at_not_before_check_in() {
    let mut item = queue_item(1, "John Smith", VisitStatus::Waiting);
    let now = item.checked_in_at + Duration::minutes(12);

    let transition = apply_action(&mut item, VisitAction::Call, now).unwrap();

    assert_eq!(transition.to, VisitStatus::Called);
    assert_eq!(item.status, VisitStatus::Called);
    assert_eq!(item.called_at, Some(now));
    assert_eq!(item.wait_minutes(), Some(12));
}

#[test]
fn call_with_clock_behind_check_in_is_clamped() {
    let mut item = queue_item(1, "John Smith", VisitStatus::Waiting);
    let skewed = item.checked_in_at - Duration::minutes(5);

    apply_action(&mut item, VisitAction::Call, skewed).unwrap();

    assert!(item.called_at.unwrap() >= item.checked_in_at);
}

#[test]
fn complete_from_called_or_in_progress_only() {
    let now = Utc.with_ymd_and_hms(2024, 6, 20, 10, 0, 0).unwrap();

    for status in [VisitStatus::Called, VisitStatus::InProgress] {
        let mut item = queue_item(1, "John Smith", status);
        apply_action(&mut item, VisitAction::Complete, now).unwrap();
        assert_eq!(item.status, VisitStatus::Completed);
        assert_eq!(item.completed_at, Some(now));
    }

    let mut waiting = queue_item(1, "John Smith", VisitStatus::Waiting);
    let result = apply_action(&mut waiting, VisitAction::Complete, now);
    assert_matches!(result, Err(VisitError::InvalidTransition { .. }));
    assert_eq!(waiting.status, VisitStatus::Waiting);
    assert_eq!(waiting.completed_at, None);
}

#[test]
fn terminal_items_are_left_untouched() {
    let now = Utc::now();
    let mut done = queue_item(4, "Sarah Johnson", VisitStatus::Completed);
    let before = done.clone();

    for action in VisitAction::ALL {
        assert!(apply_action(&mut done, action, now).is_err());
    }
    assert_eq!(done, before);
}

#[test]
fn appointments_share_the_same_table() {
    let now = Utc::now();
    let mut appointment = Appointment {
        id: "APT001".to_string(),
        patient: queue_item(1, "John Smith", VisitStatus::Waiting).patient,
        doctor: DoctorRef { id: "D002".to_string(), name: "Dr. Michael Chen".to_string() },
        department: "Neurology".to_string(),
        room: None,
        date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
        start_time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        visit_type: VisitType::FollowUp,
        status: VisitStatus::Scheduled,
        started_at: None,
        completed_at: None,
        notes: None,
        created_at: now,
    };

    assert_matches!(
        apply_action(&mut appointment, VisitAction::Call, now),
        Err(VisitError::InvalidTransition { .. })
    );
    apply_action(&mut appointment, VisitAction::Confirm, now).unwrap();
    apply_action(&mut appointment, VisitAction::Start, now).unwrap();
    apply_action(&mut appointment, VisitAction::Complete, now).unwrap();
    assert_eq!(appointment.status, VisitStatus::Completed);
    assert_eq!(appointment.started_at, Some(now));
}

// ==============================================================================
// REORDERING
// ==============================================================================

#[test]
fn move_up_second_of_two_swaps_and_renumbers() {
    let mut queue = vec![
        queue_item(1, "Alice", VisitStatus::Waiting),
        queue_item(2, "Bob", VisitStatus::Waiting),
    ];

    assert!(move_up(&mut queue, 1));

    assert_eq!(queue[0].patient.name, "Bob");
    assert_eq!(queue[0].queue_number, 1);
    assert_eq!(queue[1].patient.name, "Alice");
    assert_eq!(queue[1].queue_number, 2);
    assert!(queue.iter().all(|item| item.status == VisitStatus::Waiting));
}

#[test]
fn swaps_change_exactly_two_numbers_and_keep_the_sum() {
    for index in 0..4 {
        for up in [true, false] {
            let mut queue = waiting_queue();
            let before: Vec<u32> = queue.iter().map(|i| i.queue_number).collect();
            let ids_before: Vec<String> = queue.iter().map(|i| i.id.clone()).collect();

            let moved = if up { move_up(&mut queue, index) } else { move_down(&mut queue, index) };

            let sum_before: u32 = before.iter().sum();
            let sum_after: u32 = queue.iter().map(|i| i.queue_number).sum();
            assert_eq!(sum_before, sum_after);

            let changed_ids = queue
                .iter()
                .zip(&ids_before)
                .filter(|(item, id)| &item.id != *id)
                .count();
            if moved {
                assert_eq!(changed_ids, 2);
            } else {
                assert_eq!(changed_ids, 0);
            }
            let numbers: Vec<u32> = queue.iter().map(|i| i.queue_number).collect();
            assert_eq!(numbers, [1, 2, 3, 4]);
        }
    }
}

#[test]
fn boundary_moves_are_idempotent() {
    let mut queue = waiting_queue();
    let snapshot = queue.clone();

    assert!(!move_up(&mut queue, 0));
    assert!(!move_down(&mut queue, snapshot.len() - 1));
    assert_eq!(queue, snapshot);
}

// ==============================================================================
// FILTERING
// ==============================================================================

#[test]
fn wildcard_filter_returns_everything_in_order() {
    let queue = waiting_queue();
    let filter = VisitFilter::new()
        .with_search("")
        .with_select(FilterKey::Status, Some("all"))
        .with_select(FilterKey::Priority, Some("all"));

    assert_eq!(filter.apply(&queue), queue);
}

#[test]
fn status_filter_partitions_the_list() {
    let queue = waiting_queue();

    for status in VisitContext::Queue.vocabulary() {
        let filter = VisitFilter::new().with_select(FilterKey::Status, Some(status.to_string()));
        let (hits, rest) = filter.partition(&queue);

        assert!(hits.iter().all(|item| item.status == *status));
        assert!(rest.iter().all(|item| item.status != *status));
        assert_eq!(hits.len() + rest.len(), queue.len());
    }
}

#[test]
fn search_covers_doctor_and_room() {
    let queue = waiting_queue();
    assert_eq!(VisitFilter::new().with_search("wilson").apply(&queue).len(), 4);
    assert_eq!(VisitFilter::new().with_search("room 101").apply(&queue).len(), 4);
    assert_eq!(VisitFilter::new().with_search("q002").apply(&queue).len(), 1);
}

// ==============================================================================
// CALENDAR
// ==============================================================================

#[test]
fn calendar_has_offset_blanks_then_every_day() {
    for month in 1..=12 {
        let view = MonthView::new(2025, month).unwrap();
        let k = view.first_day().weekday().num_days_from_sunday() as usize;
        let grid = build_month_grid::<QueueItem>(view, &[], 3);

        assert_eq!(grid.leading_blanks as usize, k);
        assert!(grid.cells[..k].iter().all(|c| c.as_day().is_none()));
        assert_eq!(grid.cells.len() - k, view.days_in_month() as usize);
        assert!(grid.cells[k..].iter().all(|c| c.as_day().is_some()));
    }
}

#[test]
fn queue_items_land_on_check_in_day() {
    let view = MonthView::new(2024, 6).unwrap();
    let grid = build_month_grid(view, &waiting_queue(), 2);

    let day = grid.day(20).unwrap();
    assert_eq!(day.total, 4);
    assert_eq!(day.records.len(), 2);
    assert_eq!(day.overflow, 2);
}
