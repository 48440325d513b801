//! Composition of the reconciliation stages into one record.

use tracing::{debug, warn};

use crate::codec::{ParsedDate, parse_date, parse_punches};
use crate::config::{ReconcilePolicy, ShiftCatalog};
use crate::models::{
    AttendanceRow, AttendanceStatus, EmployeeShiftRecord, ReconcileStep, ReconcileWarning,
    RecordDate, ShiftId, WarningCode,
};

use super::dedupe::dedupe_punches;
use super::overtime::calculate_overtime;
use super::shift_assignment::{ShiftSource, assign_shift};
use super::status::classify_attendance;
use super::work_hours::calculate_work_minutes;

/// Reconciles one employee-day into an [`EmployeeShiftRecord`].
///
/// Runs the time and date codecs, deduplication, shift assignment, the work
/// and overtime calculators and the status classifier, recording an audit
/// step for each. Malformed data never fails the call: bad tokens are
/// dropped with a warning, an unparseable date is kept verbatim, and a day
/// without usable punches is classified as absent or incomplete.
///
/// The function is pure, so identical input always yields an identical
/// record and any number of days can be reconciled concurrently against the
/// same catalog.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::calculation::reconcile_day;
/// use attendance_engine::config::ConfigLoader;
/// use attendance_engine::models::{AttendanceRow, AttendanceStatus};
///
/// let loader = ConfigLoader::load("./config/attendance").unwrap();
/// let config = loader.config();
/// let row = AttendanceRow {
///     employee_id: "1002345".to_string(),
///     employee_name: "Test".to_string(),
///     department: "Ops".to_string(),
///     date: "05/01/2567".to_string(),
///     time: "08:01 15:32 15:32".to_string(),
///     shift: Some("B".to_string()),
/// };
///
/// let record = reconcile_day(&row, config.catalog(), config.policy());
/// assert_eq!(record.work_minutes, 451);
/// assert_eq!(record.status, AttendanceStatus::Present);
/// ```
pub fn reconcile_day(
    row: &AttendanceRow,
    catalog: &ShiftCatalog,
    policy: &ReconcilePolicy,
) -> EmployeeShiftRecord {
    let mut trace: Vec<ReconcileStep> = Vec::new();
    let mut warnings: Vec<ReconcileWarning> = Vec::new();
    let mut step_number: u32 = 1;

    // Step 1: Normalize time tokens
    let parsed = parse_punches(&row.time);
    if !parsed.invalid_tokens.is_empty() {
        warnings.push(ReconcileWarning::new(
            WarningCode::InvalidTimeToken,
            format!("Dropped unparseable time token(s): {}", parsed.invalid_tokens.join(", ")),
        ));
    }
    trace.push(ReconcileStep {
        step_number,
        rule_id: "time_normalization".to_string(),
        rule_name: "Time Token Normalization".to_string(),
        input: serde_json::json!({ "time": row.time }),
        output: serde_json::json!({
            "punches": parsed.minutes.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            "invalid_tokens": parsed.invalid_tokens,
        }),
        reasoning: format!(
            "{} valid punch(es), {} invalid token(s)",
            parsed.minutes.len(),
            parsed.invalid_tokens.len()
        ),
    });
    step_number += 1;

    // Step 2: Parse the date, keeping the raw token when it does not parse
    let date = match parse_date(&row.date) {
        ParsedDate::Calendar(date) => RecordDate::Calendar(date),
        ParsedDate::Invalid => {
            warnings.push(ReconcileWarning::new(
                WarningCode::InvalidDate,
                format!("Unparseable date '{}'", row.date),
            ));
            RecordDate::Unparsed(row.date.clone())
        }
    };
    trace.push(ReconcileStep {
        step_number,
        rule_id: "date_normalization".to_string(),
        rule_name: "Date Token Normalization".to_string(),
        input: serde_json::json!({ "date": row.date }),
        output: serde_json::json!({ "date": date }),
        reasoning: match &date {
            RecordDate::Calendar(d) => format!("Parsed as {}", d),
            RecordDate::Unparsed(_) => "Not a recognised date; raw token kept".to_string(),
        },
    });
    step_number += 1;

    // Step 3: Merge duplicate scans
    let punches = dedupe_punches(&parsed.minutes, policy.dedupe_threshold_minutes);
    let merged = parsed.minutes.len() - punches.len();
    if merged > 0 {
        warnings.push(ReconcileWarning::new(
            WarningCode::DuplicatePunchesMerged,
            format!("Merged {} duplicate scan(s)", merged),
        ));
    }
    trace.push(ReconcileStep {
        step_number,
        rule_id: "punch_dedupe".to_string(),
        rule_name: "Duplicate Punch Merge".to_string(),
        input: serde_json::json!({
            "punch_count": parsed.minutes.len(),
            "threshold_minutes": policy.dedupe_threshold_minutes,
        }),
        output: serde_json::json!({
            "punches": punches.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        }),
        reasoning: format!(
            "{} scan(s) within {} minute(s) of the previous one merged",
            merged, policy.dedupe_threshold_minutes
        ),
    });
    step_number += 1;

    // Step 4: Assign the shift and the time-in/time-out pair
    let hint = resolve_hint(row, &mut warnings);
    let assignment = assign_shift(&punches, hint, catalog, step_number);
    if let ShiftSource::HintNotInCatalog(id) = assignment.source {
        warnings.push(ReconcileWarning::new(
            WarningCode::ShiftNotInCatalog,
            format!(
                "Shift {} is not in the catalog; fallback shift {} used",
                id, assignment.shift.id
            ),
        ));
    }
    if assignment.reanchored {
        warnings.push(ReconcileWarning::new(
            WarningCode::TimeOutReanchored,
            format!(
                "Time-out set to scheduled end {} of overnight shift {}",
                assignment.shift.end_minute, assignment.shift.id
            ),
        ));
    }
    trace.push(assignment.audit_step);
    step_number += 1;

    let shift = assignment.shift;
    let (time_in, time_out) = (assignment.time_in, assignment.time_out);

    // Step 5: Work duration
    let work_minutes = match (time_in, time_out) {
        (Some(time_in), Some(time_out)) => {
            let result = calculate_work_minutes(
                time_in,
                time_out,
                shift.is_overnight,
                policy.work_noise_floor_minutes,
                step_number,
            );
            trace.push(result.audit_step);
            result.work_minutes
        }
        _ => {
            trace.push(ReconcileStep {
                step_number,
                rule_id: "work_minutes".to_string(),
                rule_name: "Work Duration".to_string(),
                input: serde_json::json!({
                    "time_in": time_in.map(|t| t.to_string()),
                    "time_out": time_out.map(|t| t.to_string()),
                }),
                output: serde_json::json!({ "work_minutes": 0 }),
                reasoning: "No complete time-in/time-out pair; no work credited".to_string(),
            });
            0
        }
    };
    step_number += 1;

    // Step 6: Overtime
    let overtime = calculate_overtime(&shift, &punches, policy.overtime_cap_minutes, step_number);
    if overtime.capped() {
        warnings.push(ReconcileWarning::new(
            WarningCode::OvertimeCapped,
            format!(
                "Overtime of {} minutes capped at {}",
                overtime.uncapped_minutes, overtime.overtime_minutes
            ),
        ));
    }
    let overtime_minutes = overtime.overtime_minutes;
    trace.push(overtime.audit_step);
    step_number += 1;

    // Step 7: Status
    let classification = classify_attendance(time_in, time_out, &shift, step_number);
    let status = classification.status;
    trace.push(classification.audit_step);

    // An absent day carries no minutes, whatever the calculators saw.
    let (work_minutes, overtime_minutes) = if status == AttendanceStatus::Absent {
        (0, 0)
    } else {
        (work_minutes, overtime_minutes)
    };

    debug!(
        employee_id = %row.employee_id,
        date = %date,
        shift = %shift.id,
        status = %status,
        work_minutes,
        overtime_minutes,
        warnings = warnings.len(),
        "Reconciled employee-day"
    );

    EmployeeShiftRecord {
        employee_id: row.employee_id.clone(),
        employee_name: row.employee_name.clone(),
        department: row.department.clone(),
        date,
        is_overnight: shift.is_overnight,
        shift,
        time_in,
        time_out,
        work_minutes,
        overtime_minutes,
        status,
        raw_time: row.time.clone(),
        punches,
        warnings,
        trace,
    }
}

/// Parses the row's shift hint. A label that names no shift is reported
/// instead of silently becoming the fallback.
fn resolve_hint(row: &AttendanceRow, warnings: &mut Vec<ReconcileWarning>) -> Option<ShiftId> {
    let label = row.shift.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    match label.parse::<ShiftId>() {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(employee_id = %row.employee_id, label, "Unknown shift label");
            warnings.push(ReconcileWarning::new(
                WarningCode::UnknownShiftHint,
                format!("{}; fallback shift used", err),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PunchMinute, ShiftDefinition};
    use chrono::NaiveDate;

    fn hm(h: u16, m: u16) -> PunchMinute {
        PunchMinute::from_hm(h, m).unwrap()
    }

    fn definition(id: ShiftId, start: PunchMinute, end: PunchMinute, late: PunchMinute) -> ShiftDefinition {
        ShiftDefinition {
            id,
            name: format!("Shift {}", id),
            start_minute: start,
            end_minute: end,
            is_overnight: end < start,
            overtime_boundary_minute: end,
            late_threshold_minute: late,
        }
    }

    fn catalog() -> ShiftCatalog {
        ShiftCatalog::new(
            vec![
                definition(ShiftId::B, hm(8, 0), hm(16, 0), hm(8, 30)),
                definition(ShiftId::D, hm(20, 0), hm(4, 0), hm(20, 30)),
            ],
            ShiftId::B,
        )
        .unwrap()
    }

    fn row(time: &str, shift: Option<&str>) -> AttendanceRow {
        AttendanceRow {
            employee_id: "1002345".to_string(),
            employee_name: "Test Employee".to_string(),
            department: "Ops".to_string(),
            date: "05/01/2567".to_string(),
            time: time.to_string(),
            shift: shift.map(str::to_string),
        }
    }

    fn reconcile(time: &str, shift: Option<&str>) -> EmployeeShiftRecord {
        reconcile_day(&row(time, shift), &catalog(), &ReconcilePolicy::default())
    }

    fn has_warning(record: &EmployeeShiftRecord, code: WarningCode) -> bool {
        record.warnings.iter().any(|w| w.code == code)
    }

    #[test]
    fn test_regular_day() {
        let record = reconcile("08:01 15:32 15:32", Some("B"));

        assert_eq!(record.punches, vec![hm(8, 1), hm(15, 32)]);
        assert_eq!(record.time_in, Some(hm(8, 1)));
        assert_eq!(record.time_out, Some(hm(15, 32)));
        assert_eq!(record.work_minutes, 451);
        assert_eq!(record.overtime_minutes, 0);
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(
            record.date,
            RecordDate::Calendar(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
        assert!(has_warning(&record, WarningCode::DuplicatePunchesMerged));
    }

    #[test]
    fn test_trace_has_one_step_per_stage() {
        let record = reconcile("08:01 15:32", Some("B"));
        let rule_ids: Vec<&str> = record.trace.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            rule_ids,
            vec![
                "time_normalization",
                "date_normalization",
                "punch_dedupe",
                "shift_assignment",
                "work_minutes",
                "overtime",
                "attendance_status",
            ]
        );
        let numbers: Vec<u32> = record.trace.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_no_punches_is_absent() {
        let record = reconcile("", Some("B"));
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.work_minutes, 0);
        assert_eq!(record.overtime_minutes, 0);
        assert_eq!(record.time_in, None);
    }

    #[test]
    fn test_only_invalid_tokens_is_absent_with_raw_text() {
        let record = reconcile("xx:yy ??", Some("B"));
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.raw_time, "xx:yy ??");
        assert!(has_warning(&record, WarningCode::InvalidTimeToken));
    }

    #[test]
    fn test_single_punch_is_incomplete() {
        let record = reconcile("08:05", Some("B"));
        assert_eq!(record.status, AttendanceStatus::Incomplete);
        assert_eq!(record.time_in, Some(hm(8, 5)));
        assert_eq!(record.time_out, None);
        assert_eq!(record.work_minutes, 0);
    }

    #[test]
    fn test_overnight_single_punch_reanchors() {
        let record = reconcile("20:05", Some("D"));
        assert_eq!(record.time_out, Some(hm(4, 0)));
        assert_eq!(record.work_minutes, 475);
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.is_overnight);
        assert!(has_warning(&record, WarningCode::TimeOutReanchored));
    }

    #[test]
    fn test_unknown_hint_falls_back_with_warning() {
        let record = reconcile("08:00 16:00", Some("Q"));
        assert_eq!(record.shift.id, ShiftId::B);
        assert!(has_warning(&record, WarningCode::UnknownShiftHint));
    }

    #[test]
    fn test_hint_not_in_catalog_falls_back_with_warning() {
        let record = reconcile("08:00 16:00", Some("E"));
        assert_eq!(record.shift.id, ShiftId::B);
        assert!(has_warning(&record, WarningCode::ShiftNotInCatalog));
    }

    #[test]
    fn test_blank_hint_is_no_hint() {
        let record = reconcile("08:00 16:00", Some("  "));
        assert_eq!(record.shift.id, ShiftId::B);
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_unparseable_date_keeps_raw_token() {
        let mut input = row("08:00 16:00", Some("B"));
        input.date = "32/13/2567".to_string();
        let record = reconcile_day(&input, &catalog(), &ReconcilePolicy::default());

        assert_eq!(record.date, RecordDate::Unparsed("32/13/2567".to_string()));
        assert!(has_warning(&record, WarningCode::InvalidDate));
        assert_eq!(record.work_minutes, 480);
    }

    #[test]
    fn test_overtime_cap_warning() {
        let record = reconcile("08:00 23:30", Some("B"));
        assert_eq!(record.overtime_minutes, 300);
        assert!(has_warning(&record, WarningCode::OvertimeCapped));
    }

    #[test]
    fn test_record_references_catalog_shift() {
        let catalog = catalog();
        let record = reconcile_day(&row("08:00 16:00", Some("B")), &catalog, &ReconcilePolicy::default());
        assert!(std::sync::Arc::ptr_eq(&record.shift, catalog.get(ShiftId::B).unwrap()));
    }

    #[test]
    fn test_deterministic() {
        let first = reconcile("08:00 08:01 12:00 13:00 19:22", Some("B"));
        let second = reconcile("08:00 08:01 12:00 13:00 19:22", Some("B"));
        assert_eq!(first, second);
    }
}
