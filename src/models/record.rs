//! Reconciliation output models.
//!
//! This module contains the [`EmployeeShiftRecord`] type, the engine's single
//! output unit, together with the status, warning and audit types attached to
//! it and the [`RecordDisplay`] strings handed to display and export code.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codec::{DurationLocale, format_duration, format_time};

use super::{PunchMinute, ShiftDefinition};

/// Attendance classification of an employee-day.
///
/// # Example
///
/// ```
/// use attendance_engine::models::AttendanceStatus;
///
/// assert_eq!(AttendanceStatus::Late.as_str(), "late");
/// assert_eq!(serde_json::to_string(&AttendanceStatus::Incomplete).unwrap(), "\"incomplete\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Arrived on time (or on an overnight shift).
    Present,
    /// Arrived after the shift's late threshold.
    Late,
    /// No usable punch for the day.
    Absent,
    /// A time-in exists but no time-out could be established.
    Incomplete,
}

impl AttendanceStatus {
    /// Returns the lowercase status name.
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Incomplete => "incomplete",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The date of a record: parsed, or the original token when it could not be
/// parsed. A date is never synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RecordDate {
    /// A successfully parsed calendar date.
    Calendar(NaiveDate),
    /// The raw date token, kept for diagnostic display.
    Unparsed(String),
}

impl RecordDate {
    /// Returns the calendar date, if the token parsed.
    pub fn calendar(&self) -> Option<NaiveDate> {
        match self {
            RecordDate::Calendar(date) => Some(*date),
            RecordDate::Unparsed(_) => None,
        }
    }
}

impl std::fmt::Display for RecordDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordDate::Calendar(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            RecordDate::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Kinds of data problems noticed while reconciling a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// One or more time tokens could not be parsed and were dropped.
    InvalidTimeToken,
    /// The date token could not be parsed.
    InvalidDate,
    /// The shift hint is not a known shift label.
    UnknownShiftHint,
    /// The shift hint names a shift the catalog does not define.
    ShiftNotInCatalog,
    /// Near-simultaneous duplicate scans were merged.
    DuplicatePunchesMerged,
    /// An overnight time-out was replaced by the scheduled shift end.
    TimeOutReanchored,
    /// Overtime exceeded the policy cap and was clamped.
    OvertimeCapped,
}

/// A warning generated while reconciling a row.
///
/// Warnings never change the shape of the record; they explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileWarning {
    /// The kind of problem.
    pub code: WarningCode,
    /// A human-readable description of the problem.
    pub message: String,
}

impl ReconcileWarning {
    /// Creates a new warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A single step in the reconciliation audit trail.
///
/// Each step captures the input, output and reasoning of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Identifier of the stage that produced this step.
    pub rule_id: String,
    /// Human-readable name of the stage.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The reconciled work record for one employee-day.
///
/// Invariants upheld by the record builder:
/// - `overtime_minutes` never exceeds the policy cap;
/// - without a `time_in` the status is [`AttendanceStatus::Absent`] and both
///   minute totals are zero;
/// - a `time_in` without a `time_out` is [`AttendanceStatus::Incomplete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeShiftRecord {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee display name.
    pub employee_name: String,
    /// Department name.
    pub department: String,
    /// The day this record covers.
    pub date: RecordDate,
    /// The assigned shift, shared with the catalog.
    pub shift: Arc<ShiftDefinition>,
    /// Canonical arrival punch.
    pub time_in: Option<PunchMinute>,
    /// Canonical departure punch.
    pub time_out: Option<PunchMinute>,
    /// Minutes between time-in and time-out.
    pub work_minutes: u32,
    /// Minutes worked past the shift's overtime boundary.
    pub overtime_minutes: u32,
    /// Attendance classification.
    pub status: AttendanceStatus,
    /// Whether the assigned shift wraps through midnight.
    pub is_overnight: bool,
    /// The time string exactly as it arrived.
    pub raw_time: String,
    /// The cleaned, deduplicated punch list.
    pub punches: Vec<PunchMinute>,
    /// Data problems noticed while reconciling.
    pub warnings: Vec<ReconcileWarning>,
    /// Audit trail of every reconciliation stage.
    pub trace: Vec<ReconcileStep>,
}

impl EmployeeShiftRecord {
    /// Renders the record's display strings.
    pub fn display(&self, locale: DurationLocale) -> RecordDisplay {
        RecordDisplay {
            date: self.date.to_string(),
            shift: self.shift.id.to_string(),
            time_in: display_time(self.time_in),
            time_out: display_time(self.time_out),
            work_duration: format_duration(self.work_minutes, locale),
            overtime_duration: format_duration(self.overtime_minutes, locale),
            work_hours: minutes_to_hours(self.work_minutes),
            status: self.status.to_string(),
        }
    }
}

/// Formatted strings for one record, as consumed by display and export code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDisplay {
    /// The date, or the raw token when it did not parse.
    pub date: String,
    /// The shift label.
    pub shift: String,
    /// Time-in as `HH:MM`, or `-`.
    pub time_in: String,
    /// Time-out as `HH:MM`, or `-`.
    pub time_out: String,
    /// Localized work duration, e.g. `9 ชม. 0 นาที`.
    pub work_duration: String,
    /// Localized overtime duration.
    pub overtime_duration: String,
    /// Work time in decimal hours, rounded to two places.
    pub work_hours: Decimal,
    /// The status name.
    pub status: String,
}

fn display_time(minute: Option<PunchMinute>) -> String {
    minute.map(format_time).unwrap_or_else(|| "-".to_string())
}

fn minutes_to_hours(minutes: u32) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::models::ShiftId;

    fn hm(h: u16, m: u16) -> PunchMinute {
        PunchMinute::from_hm(h, m).unwrap()
    }

    fn shift_b() -> Arc<ShiftDefinition> {
        Arc::new(ShiftDefinition {
            id: ShiftId::B,
            name: "Day B".to_string(),
            start_minute: hm(8, 0),
            end_minute: hm(16, 0),
            is_overnight: false,
            overtime_boundary_minute: hm(16, 0),
            late_threshold_minute: hm(8, 30),
        })
    }

    fn record(time_in: Option<PunchMinute>, time_out: Option<PunchMinute>, work: u32) -> EmployeeShiftRecord {
        EmployeeShiftRecord {
            employee_id: "1002345".to_string(),
            employee_name: "Test".to_string(),
            department: "Ops".to_string(),
            date: RecordDate::Calendar(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            shift: shift_b(),
            time_in,
            time_out,
            work_minutes: work,
            overtime_minutes: 0,
            status: AttendanceStatus::Present,
            is_overnight: false,
            raw_time: String::new(),
            punches: vec![],
            warnings: vec![],
            trace: vec![],
        }
    }

    #[test]
    fn test_display_full_day_thai() {
        let display = record(Some(hm(8, 0)), Some(hm(17, 0)), 540).display(DurationLocale::Thai);

        assert_eq!(display.date, "2024-01-05");
        assert_eq!(display.shift, "B");
        assert_eq!(display.time_in, "08:00");
        assert_eq!(display.time_out, "17:00");
        assert_eq!(display.work_duration, "9 ชม. 0 นาที");
        assert_eq!(display.overtime_duration, "0 ชม. 0 นาที");
        assert_eq!(display.work_hours, Decimal::from_str("9").unwrap());
        assert_eq!(display.status, "present");
    }

    #[test]
    fn test_display_missing_times_use_dash() {
        let display = record(Some(hm(8, 5)), None, 0).display(DurationLocale::English);
        assert_eq!(display.time_in, "08:05");
        assert_eq!(display.time_out, "-");
        assert_eq!(display.work_duration, "0 h 0 min");
    }

    #[test]
    fn test_work_hours_rounded_to_two_places() {
        let display = record(Some(hm(8, 1)), Some(hm(15, 32)), 451).display(DurationLocale::Thai);
        assert_eq!(display.work_hours, Decimal::from_str("7.52").unwrap());
    }

    #[test]
    fn test_unparsed_date_displays_raw_token() {
        let date = RecordDate::Unparsed("31/02/xx".to_string());
        assert_eq!(date.to_string(), "31/02/xx");
        assert_eq!(date.calendar(), None);
    }

    #[test]
    fn test_record_date_serialization_is_tagged() {
        let json = serde_json::to_value(RecordDate::Unparsed("??".to_string())).unwrap();
        assert_eq!(json["kind"], "unparsed");
        assert_eq!(json["value"], "??");
    }

    #[test]
    fn test_warning_code_serialization() {
        let warning = ReconcileWarning::new(WarningCode::TimeOutReanchored, "re-anchored");
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["code"], "TIME_OUT_REANCHORED");
    }
}
