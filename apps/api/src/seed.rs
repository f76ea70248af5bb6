// Demo records loaded at startup so every dashboard has something to show.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use visit_cell::{
    Appointment, DoctorRef, PatientRef, Priority, QueueItem, ScheduleSlot, VisitStatus, VisitType,
};

fn patient(id: &str, name: &str, phone: &str, age: u32) -> PatientRef {
    PatientRef {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        age: Some(age),
    }
}

fn doctor(id: &str, name: &str) -> DoctorRef {
    DoctorRef { id: id.to_string(), name: name.to_string() }
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

pub fn queue(now: DateTime<Utc>) -> Vec<QueueItem> {
    let item = |number: u32,
                patient: PatientRef,
                doctor: DoctorRef,
                department: &str,
                priority: Priority,
                status: VisitStatus,
                minutes_ago: i64| {
        let checked_in_at = now - Duration::minutes(minutes_ago);
        QueueItem {
            id: format!("Q{:03}", number),
            queue_number: number,
            patient,
            doctor,
            department: department.to_string(),
            room: Some(format!("Room {}", 100 + number)),
            visit_type: VisitType::WalkIn,
            priority,
            status,
            checked_in_at,
            called_at: matches!(status, VisitStatus::Called | VisitStatus::InProgress)
                .then(|| checked_in_at + Duration::minutes(10)),
            started_at: (status == VisitStatus::InProgress).then(|| checked_in_at + Duration::minutes(12)),
            completed_at: None,
            estimated_wait_minutes: Some(15 * number),
            notes: None,
        }
    };

    vec![
        item(
            1,
            patient("P001", "John Smith", "+1 555 123 4567", 45),
            doctor("D001", "Dr. Sarah Wilson"),
            "Cardiology",
            Priority::High,
            VisitStatus::InProgress,
            40,
        ),
        item(
            2,
            patient("P002", "Emily Davis", "+1 555 234 5678", 32),
            doctor("D002", "Dr. Michael Chen"),
            "Neurology",
            Priority::Normal,
            VisitStatus::Called,
            25,
        ),
        item(
            3,
            patient("P003", "Michael Brown", "+1 555 345 6789", 61),
            doctor("D001", "Dr. Sarah Wilson"),
            "Cardiology",
            Priority::Urgent,
            VisitStatus::Waiting,
            15,
        ),
        item(
            4,
            patient("P004", "Sophia Martinez", "+1 555 456 7890", 8),
            doctor("D003", "Dr. Emily Rodriguez"),
            "Pediatrics",
            Priority::Normal,
            VisitStatus::Waiting,
            5,
        ),
    ]
}

pub fn appointments(today: NaiveDate, now: DateTime<Utc>) -> Vec<Appointment> {
    let appointment = |id: &str,
                       patient: PatientRef,
                       doctor: DoctorRef,
                       department: &str,
                       days_ahead: i64,
                       start: NaiveTime,
                       visit_type: VisitType,
                       status: VisitStatus| Appointment {
        id: id.to_string(),
        patient,
        doctor,
        department: department.to_string(),
        room: None,
        date: today + Duration::days(days_ahead),
        start_time: start,
        end_time: start + Duration::minutes(30),
        visit_type,
        status,
        started_at: None,
        completed_at: None,
        notes: None,
        created_at: now,
    };

    vec![
        appointment(
            "APT001",
            patient("P001", "John Smith", "+1 555 123 4567", 45),
            doctor("D001", "Dr. Sarah Wilson"),
            "Cardiology",
            0,
            at(9, 0),
            VisitType::FollowUp,
            VisitStatus::Confirmed,
        ),
        appointment(
            "APT002",
            patient("P002", "Emily Davis", "+1 555 234 5678", 32),
            doctor("D002", "Dr. Michael Chen"),
            "Neurology",
            1,
            at(10, 30),
            VisitType::Consultation,
            VisitStatus::Scheduled,
        ),
        appointment(
            "APT003",
            patient("P001", "John Smith", "+1 555 123 4567", 45),
            doctor("D003", "Dr. Emily Rodriguez"),
            "Orthopedics",
            7,
            at(14, 0),
            VisitType::Consultation,
            VisitStatus::Scheduled,
        ),
        appointment(
            "APT004",
            patient("P005", "David Lee", "+1 555 567 8901", 57),
            doctor("D001", "Dr. Sarah Wilson"),
            "Cardiology",
            -2,
            at(11, 0),
            VisitType::Consultation,
            VisitStatus::NoShow,
        ),
    ]
}

pub fn schedule(today: NaiveDate) -> Vec<ScheduleSlot> {
    let slot = |id: &str, doctor: DoctorRef, department: &str, days_ahead: i64, start: NaiveTime, patient: Option<PatientRef>| {
        ScheduleSlot {
            id: id.to_string(),
            doctor,
            patient,
            department: department.to_string(),
            room: Some("Clinic A".to_string()),
            date: today + Duration::days(days_ahead),
            start_time: start,
            end_time: start + Duration::minutes(45),
            visit_type: VisitType::Scheduled,
            status: VisitStatus::Scheduled,
            started_at: None,
            completed_at: None,
            notes: None,
        }
    };

    vec![
        slot(
            "S001",
            doctor("D001", "Dr. Sarah Wilson"),
            "Cardiology",
            0,
            at(9, 0),
            Some(patient("P001", "John Smith", "+1 555 123 4567", 45)),
        ),
        slot("S002", doctor("D001", "Dr. Sarah Wilson"), "Cardiology", 0, at(10, 0), None),
        slot("S003", doctor("D002", "Dr. Michael Chen"), "Neurology", 1, at(9, 0), None),
        slot("S004", doctor("D003", "Dr. Emily Rodriguez"), "Pediatrics", 3, at(13, 30), None),
    ]
}
