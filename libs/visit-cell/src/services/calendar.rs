// libs/visit-cell/src/services/calendar.rs
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::VisitError;
use crate::models::Dated;

/// The month a calendar screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthView {
    first: NaiveDate,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Result<Self, VisitError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(VisitError::InvalidMonth { year, month })
    }

    /// The "today" button.
    pub fn containing(date: NaiveDate) -> Self {
        Self { first: date.with_day(1).unwrap_or(date) }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn prev(&self) -> Self {
        Self {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next_first) => (next_first - self.first).num_days() as u32,
            // only reachable at the end of chrono's range, which is a December
            None => 31,
        }
    }

    /// Blank cells before day 1 in a Sunday-first week.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell<T> {
    pub date: NaiveDate,
    pub records: Vec<T>,
    pub total: usize,
    pub overflow: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell<T> {
    Blank,
    Day(DayCell<T>),
}

impl<T> CalendarCell<T> {
    pub fn as_day(&self) -> Option<&DayCell<T>> {
        match self {
            CalendarCell::Day(day) => Some(day),
            CalendarCell::Blank => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid<T> {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub cells: Vec<CalendarCell<T>>,
}

impl<T> CalendarGrid<T> {
    pub fn days(&self) -> impl Iterator<Item = &DayCell<T>> {
        self.cells.iter().filter_map(CalendarCell::as_day)
    }

    pub fn day(&self, day: u32) -> Option<&DayCell<T>> {
        self.days().find(|cell| cell.date.day() == day)
    }
}

/// Lays out `view` as blanks followed by one cell per day, each holding at most
/// `per_cell_limit` records dated that day.
pub fn build_month_grid<T: Dated + Clone>(
    view: MonthView,
    records: &[T],
    per_cell_limit: usize,
) -> CalendarGrid<T> {
    let leading_blanks = view.leading_blanks();
    let days_in_month = view.days_in_month();

    let mut cells = Vec::with_capacity((leading_blanks + days_in_month) as usize);
    cells.extend((0..leading_blanks).map(|_| CalendarCell::Blank));

    for date in view.first_day().iter_days().take(days_in_month as usize) {
        let on_day: Vec<&T> = records.iter().filter(|r| r.visit_date() == date).collect();
        let total = on_day.len();
        let shown: Vec<T> = on_day.into_iter().take(per_cell_limit).cloned().collect();

        cells.push(CalendarCell::Day(DayCell {
            date,
            overflow: total - shown.len(),
            records: shown,
            total,
        }));
    }

    debug!(
        "Built calendar {}-{:02}: {} blanks, {} days",
        view.year(),
        view.month(),
        leading_blanks,
        days_in_month
    );

    CalendarGrid {
        year: view.year(),
        month: view.month(),
        leading_blanks,
        days_in_month,
        cells,
    }
}
