// =====================================================================================
// FORM VALIDATION - BOOKING AND PAYMENT INPUT CHECKS
// =====================================================================================

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;
use tracing::debug;

const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 ()\-]{6,18}[0-9]$";
const ISO_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const CARD_PATTERN: &str = r"^[0-9]{13,19}$";
const EXPIRY_PATTERN: &str = r"^(0[1-9]|1[0-2])/([0-9]{2})$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    Required { field: String },
    InvalidPhone { value: String },
    InvalidDate { value: String },
    DateInPast { date: NaiveDate },
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },
    NonPositiveAmount,
    InvalidCardNumber,
    InvalidExpiry { value: String },
    CardExpired,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Required { field } => write!(f, "{} is required", field),
            ValidationIssue::InvalidPhone { value } => write!(f, "'{}' is not a valid phone number", value),
            ValidationIssue::InvalidDate { value } => write!(f, "'{}' is not a valid date (expected YYYY-MM-DD)", value),
            ValidationIssue::DateInPast { date } => write!(f, "{} is in the past", date),
            ValidationIssue::InvalidTimeRange { start, end } => {
                write!(f, "start time {} must be before end time {}", start, end)
            }
            ValidationIssue::NonPositiveAmount => write!(f, "amount must be greater than zero"),
            ValidationIssue::InvalidCardNumber => write!(f, "card number is invalid"),
            ValidationIssue::InvalidExpiry { value } => write!(f, "'{}' is not a valid expiry (expected MM/YY)", value),
            ValidationIssue::CardExpired => write!(f, "card has expired"),
        }
    }
}

/// Joins issues into the single line shown in the alert banner.
pub fn summarize(issues: &[ValidationIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

pub struct FormValidator {
    phone: Regex,
    iso_date: Regex,
    card: Regex,
    expiry: Regex,
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormValidator {
    pub fn new() -> Self {
        Self {
            phone: Regex::new(PHONE_PATTERN).expect("phone pattern compiles"),
            iso_date: Regex::new(ISO_DATE_PATTERN).expect("date pattern compiles"),
            card: Regex::new(CARD_PATTERN).expect("card pattern compiles"),
            expiry: Regex::new(EXPIRY_PATTERN).expect("expiry pattern compiles"),
        }
    }

    pub fn check_required(&self, field: &str, value: &str) -> Option<ValidationIssue> {
        if value.trim().is_empty() {
            Some(ValidationIssue::Required { field: field.to_string() })
        } else {
            None
        }
    }

    pub fn check_phone(&self, value: &str) -> Option<ValidationIssue> {
        if self.phone.is_match(value.trim()) {
            None
        } else {
            debug!("Rejected phone number input");
            Some(ValidationIssue::InvalidPhone { value: value.to_string() })
        }
    }

    pub fn parse_date(&self, value: &str) -> Result<NaiveDate, ValidationIssue> {
        let trimmed = value.trim();
        if !self.iso_date.is_match(trimmed) {
            return Err(ValidationIssue::InvalidDate { value: value.to_string() });
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|_| ValidationIssue::InvalidDate { value: value.to_string() })
    }

    pub fn check_not_past(&self, date: NaiveDate, today: NaiveDate) -> Option<ValidationIssue> {
        (date < today).then_some(ValidationIssue::DateInPast { date })
    }

    pub fn check_time_range(&self, start: NaiveTime, end: NaiveTime) -> Option<ValidationIssue> {
        (start >= end).then_some(ValidationIssue::InvalidTimeRange { start, end })
    }

    pub fn check_amount(&self, amount_cents: i64) -> Option<ValidationIssue> {
        (amount_cents <= 0).then_some(ValidationIssue::NonPositiveAmount)
    }

    /// Card number (spaces and dashes ignored) plus `MM/YY` expiry.
    pub fn check_card(&self, number: &str, expiry: &str, today: NaiveDate) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let digits = normalize_card_number(number);
        if !self.card.is_match(&digits) || !luhn_valid(&digits) {
            issues.push(ValidationIssue::InvalidCardNumber);
        }

        match self.expiry.captures(expiry.trim()) {
            Some(caps) => {
                let month: u32 = caps[1].parse().unwrap_or(0);
                let year: i32 = 2000 + caps[2].parse::<i32>().unwrap_or(0);
                if (year, month) < (today.year(), today.month()) {
                    issues.push(ValidationIssue::CardExpired);
                }
            }
            None => issues.push(ValidationIssue::InvalidExpiry { value: expiry.to_string() }),
        }

        issues
    }
}

pub fn normalize_card_number(number: &str) -> String {
    number.chars().filter(|c| !matches!(c, ' ' | '-')).collect()
}

pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// `4111111111111111` -> `**** **** **** 1111`
pub fn mask_card(number: &str) -> String {
    let digits = normalize_card_number(number);
    let last_four: String = digits.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("**** **** **** {}", last_four)
}
