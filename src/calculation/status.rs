//! Attendance status classification.

use crate::models::{AttendanceStatus, PunchMinute, ReconcileStep, ShiftDefinition};

/// Classifies an arrival.
///
/// - no time-in: [`AttendanceStatus::Absent`];
/// - overnight shift: [`AttendanceStatus::Present`], lateness is not evaluated;
/// - time-in after the late threshold: [`AttendanceStatus::Late`];
/// - otherwise [`AttendanceStatus::Present`].
///
/// Whether a missing time-out makes the day incomplete is decided by
/// [`classify_attendance`].
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::classify_status;
/// use attendance_engine::models::{AttendanceStatus, PunchMinute};
///
/// let threshold = PunchMinute::from_hm(8, 30).unwrap();
/// let nine = PunchMinute::from_hm(9, 0);
/// assert_eq!(classify_status(nine, false, threshold), AttendanceStatus::Late);
/// assert_eq!(classify_status(nine, true, threshold), AttendanceStatus::Present);
/// assert_eq!(classify_status(None, false, threshold), AttendanceStatus::Absent);
/// ```
pub fn classify_status(
    time_in: Option<PunchMinute>,
    is_overnight: bool,
    late_threshold: PunchMinute,
) -> AttendanceStatus {
    match time_in {
        None => AttendanceStatus::Absent,
        // TODO: confirm with HR whether overnight arrivals should be checked for lateness.
        Some(_) if is_overnight => AttendanceStatus::Present,
        Some(time_in) if time_in > late_threshold => AttendanceStatus::Late,
        Some(_) => AttendanceStatus::Present,
    }
}

/// The status of an employee-day together with its audit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusClassification {
    /// The final status.
    pub status: AttendanceStatus,
    /// The audit step recording the classification.
    pub audit_step: ReconcileStep,
}

/// Classifies a whole employee-day.
///
/// Applies [`classify_status`], then marks a day with a time-in but no
/// time-out as [`AttendanceStatus::Incomplete`].
pub fn classify_attendance(
    time_in: Option<PunchMinute>,
    time_out: Option<PunchMinute>,
    shift: &ShiftDefinition,
    step_number: u32,
) -> StatusClassification {
    let arrival = classify_status(time_in, shift.is_overnight, shift.late_threshold_minute);

    let (status, reasoning) = match (arrival, time_in, time_out) {
        (AttendanceStatus::Absent, _, _) => (arrival, "No time-in punch".to_string()),
        (_, Some(time_in), None) => (
            AttendanceStatus::Incomplete,
            format!("Time-in {} has no matching time-out", time_in),
        ),
        (_, _, _) if shift.is_overnight => (
            arrival,
            format!("Overnight shift {}: lateness not evaluated", shift.id),
        ),
        (AttendanceStatus::Late, Some(time_in), _) => (
            arrival,
            format!(
                "Time-in {} is after late threshold {}",
                time_in, shift.late_threshold_minute
            ),
        ),
        (_, _, _) => (
            arrival,
            format!(
                "Time-in is at or before late threshold {}",
                shift.late_threshold_minute
            ),
        ),
    };

    let audit_step = ReconcileStep {
        step_number,
        rule_id: "attendance_status".to_string(),
        rule_name: "Attendance Status".to_string(),
        input: serde_json::json!({
            "time_in": time_in.map(|t| t.to_string()),
            "time_out": time_out.map(|t| t.to_string()),
            "is_overnight": shift.is_overnight,
            "late_threshold": shift.late_threshold_minute.to_string(),
        }),
        output: serde_json::json!({ "status": status }),
        reasoning,
    };

    StatusClassification { status, audit_step }
}
