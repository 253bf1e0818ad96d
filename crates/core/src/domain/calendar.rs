use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user-created reminder as validated from the calendar backend.
/// `end_date` may precede `start_date` in upstream data; the aggregation
/// engine treats such a range as covering zero days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    /// Raw reminder type from upstream ("1"/"marketing", "2"/"schedule", ...).
    pub kind: String,
    pub content: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A special day (holiday, seasonal division, anniversary, ...) from the
/// curated calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDay {
    pub id: i64,
    pub name: String,
    /// Display type label ("공휴일", "절기", "기념일", ...).
    pub kind: String,
    pub category: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub content: Option<String>,
}

/// An AI-generated marketing suggestion attached to a special day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDaySuggestion {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Model confidence on a 0-100 scale, when the model reported one.
    pub ml_confidence: Option<f64>,
    pub target_customer: Option<String>,
    pub suggested_action: Option<String>,
    pub expected_effect: Option<String>,
}

/// A special day paired with its suggestion, if one was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySuggestion {
    pub special_day: SpecialDay,
    pub suggestion: Option<SpecialDaySuggestion>,
}
