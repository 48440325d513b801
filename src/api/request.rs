//! Request types for the attendance reconciliation API.
//!
//! This module defines the JSON request structures for the `/reconcile` endpoint.

use serde::{Deserialize, Serialize};

use crate::codec::DurationLocale;
use crate::models::AttendanceRow;

/// Request body for the `/reconcile` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// The extracted rows, one per employee-day.
    pub rows: Vec<RowRequest>,
    /// Language for duration strings.
    #[serde(default)]
    pub locale: DurationLocale,
}

/// Punch times in a row: one whitespace-separated string or a list of tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeField {
    /// `"08:01 15:32"`
    Line(String),
    /// `["08:01", "15:32"]`
    Tokens(Vec<String>),
}

impl Default for TimeField {
    fn default() -> Self {
        TimeField::Line(String::new())
    }
}

impl TimeField {
    fn into_line(self) -> String {
        match self {
            TimeField::Line(line) => line,
            TimeField::Tokens(tokens) => tokens.join(" "),
        }
    }
}

/// One row in a reconcile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRequest {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee display name.
    #[serde(default)]
    pub employee_name: String,
    /// Department name.
    #[serde(default)]
    pub department: String,
    /// Raw date token.
    pub date: String,
    /// Punch times.
    #[serde(default)]
    pub time: TimeField,
    /// Optional shift label hint.
    #[serde(default)]
    pub shift: Option<String>,
}

impl From<RowRequest> for AttendanceRow {
    fn from(req: RowRequest) -> Self {
        AttendanceRow {
            employee_id: req.employee_id,
            employee_name: req.employee_name,
            department: req.department,
            date: req.date,
            time: req.time.into_line(),
            shift: req.shift,
        }
    }
}
