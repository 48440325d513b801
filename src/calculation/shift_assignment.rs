//! Shift selection and time-in/time-out pairing.
//!
//! Given the cleaned punches of one employee-day, this module selects the
//! shift window the day is measured against and the canonical arrival and
//! departure punches.

use std::sync::Arc;

use serde::Serialize;

use crate::config::ShiftCatalog;
use crate::models::{PunchMinute, ReconcileStep, ShiftDefinition, ShiftId};

/// How the shift for a day was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "shift")]
pub enum ShiftSource {
    /// The row's hint named a catalog shift.
    Hint(ShiftId),
    /// No hint was given; the catalog fallback applies.
    Fallback,
    /// The hint names a shift the catalog does not define; the fallback applies.
    HintNotInCatalog(ShiftId),
}

/// The selected shift and canonical punch pair for an employee-day.
#[derive(Debug, Clone)]
pub struct ShiftAssignment {
    /// The assigned shift definition.
    pub shift: Arc<ShiftDefinition>,
    /// How the shift was chosen.
    pub source: ShiftSource,
    /// The punch closest to the scheduled start.
    pub time_in: Option<PunchMinute>,
    /// The last punch, or the scheduled end after overnight re-anchoring.
    pub time_out: Option<PunchMinute>,
    /// True when `time_out` was replaced by the scheduled shift end.
    pub reanchored: bool,
    /// The audit step recording this assignment.
    pub audit_step: ReconcileStep,
}

/// Resolves a shift hint against the catalog.
///
/// A hint that names a shift the catalog does not carry falls back, and
/// says so in the returned [`ShiftSource`].
pub fn resolve_shift(
    hint: Option<ShiftId>,
    catalog: &ShiftCatalog,
) -> (Arc<ShiftDefinition>, ShiftSource) {
    match hint {
        Some(id) => match catalog.get(id) {
            Some(shift) => (Arc::clone(shift), ShiftSource::Hint(id)),
            None => (
                Arc::clone(catalog.fallback()),
                ShiftSource::HintNotInCatalog(id),
            ),
        },
        None => (Arc::clone(catalog.fallback()), ShiftSource::Fallback),
    }
}

/// Assigns a shift and picks the time-in/time-out pair.
///
/// 1. The hinted shift is used when the catalog defines it, otherwise the fallback.
/// 2. `time_in` is the punch closest to the scheduled start; ties go to the
///    earlier punch.
/// 3. `time_out` is the latest punch by minute of day.
/// 4. On an overnight shift, a `time_out` at or before `time_in` is replaced
///    by the scheduled end. A lone punch on an overnight shift takes this path
///    too.
/// 5. Without punches there is no time-in. On a day shift, a `time_out` that
///    is the same punch as `time_in` is no departure at all.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::calculation::assign_shift;
/// use attendance_engine::config::ConfigLoader;
/// use attendance_engine::models::{PunchMinute, ShiftId};
///
/// let loader = ConfigLoader::load("./config/attendance").unwrap();
/// let hm = |h, m| PunchMinute::from_hm(h, m).unwrap();
///
/// let assignment = assign_shift(&[hm(20, 5)], Some(ShiftId::D), loader.config().catalog(), 1);
/// assert_eq!(assignment.time_in, Some(hm(20, 5)));
/// assert_eq!(assignment.time_out, Some(hm(4, 0)));
/// assert!(assignment.reanchored);
/// ```
pub fn assign_shift(
    punches: &[PunchMinute],
    hint: Option<ShiftId>,
    catalog: &ShiftCatalog,
    step_number: u32,
) -> ShiftAssignment {
    let (shift, source) = resolve_shift(hint, catalog);

    let time_in = punches
        .iter()
        .copied()
        .min_by_key(|p| (p.distance(shift.start_minute), *p));
    let last = punches.iter().copied().max();

    let mut reanchored = false;
    let time_out = match (time_in, last) {
        (Some(time_in), Some(last)) if shift.is_overnight && last <= time_in => {
            reanchored = true;
            Some(shift.end_minute)
        }
        (Some(time_in), Some(last)) if last == time_in => None,
        (_, last) => last,
    };

    let reasoning = match (time_in, time_out) {
        (None, _) => format!("No punches; shift {} assigned without a time-in", shift.id),
        (Some(time_in), None) => format!(
            "Time-in {} is closest to shift {} start {}; no later punch for a time-out",
            time_in, shift.id, shift.start_minute
        ),
        (Some(time_in), Some(time_out)) if reanchored => format!(
            "Time-in {} is closest to shift {} start {}; last punch does not follow it, time-out re-anchored to shift end {}",
            time_in, shift.id, shift.start_minute, time_out
        ),
        (Some(time_in), Some(time_out)) => format!(
            "Time-in {} is closest to shift {} start {}; time-out is last punch {}",
            time_in, shift.id, shift.start_minute, time_out
        ),
    };

    let audit_step = ReconcileStep {
        step_number,
        rule_id: "shift_assignment".to_string(),
        rule_name: "Shift Assignment".to_string(),
        input: serde_json::json!({
            "punches": punches.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            "hint": hint.map(|h| h.to_string()),
        }),
        output: serde_json::json!({
            "shift": shift.id.to_string(),
            "source": source,
            "time_in": time_in.map(|t| t.to_string()),
            "time_out": time_out.map(|t| t.to_string()),
            "reanchored": reanchored,
        }),
        reasoning,
    };

    ShiftAssignment {
        shift,
        source,
        time_in,
        time_out,
        reanchored,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u16, m: u16) -> PunchMinute {
        PunchMinute::from_hm(h, m).unwrap()
    }

    fn definition(id: ShiftId, start: (u16, u16), end: (u16, u16)) -> ShiftDefinition {
        let start_minute = hm(start.0, start.1);
        let end_minute = hm(end.0, end.1);
        ShiftDefinition {
            id,
            name: format!("Shift {}", id),
            start_minute,
            end_minute,
            is_overnight: end_minute < start_minute,
            overtime_boundary_minute: end_minute,
            late_threshold_minute: hm(start.0, start.1 + 30),
        }
    }

    fn catalog() -> ShiftCatalog {
        ShiftCatalog::new(
            vec![
                definition(ShiftId::B, (8, 0), (16, 0)),
                definition(ShiftId::D, (20, 0), (4, 0)),
            ],
            ShiftId::B,
        )
        .unwrap()
    }

    // ==========================================================================
    // Shift resolution
    // ==========================================================================

    #[test]
    fn test_hint_selects_shift() {
        let (shift, source) = resolve_shift(Some(ShiftId::D), &catalog());
        assert_eq!(shift.id, ShiftId::D);
        assert_eq!(source, ShiftSource::Hint(ShiftId::D));
    }

    #[test]
    fn test_no_hint_uses_fallback() {
        let (shift, source) = resolve_shift(None, &catalog());
        assert_eq!(shift.id, ShiftId::B);
        assert_eq!(source, ShiftSource::Fallback);
    }

    #[test]
    fn test_hint_missing_from_catalog_is_reported() {
        let (shift, source) = resolve_shift(Some(ShiftId::E), &catalog());
        assert_eq!(shift.id, ShiftId::B);
        assert_eq!(source, ShiftSource::HintNotInCatalog(ShiftId::E));
    }

    // ==========================================================================
    // Punch pairing
    // ==========================================================================

    #[test]
    fn test_day_shift_in_and_out() {
        let result = assign_shift(&[hm(8, 1), hm(15, 32)], Some(ShiftId::B), &catalog(), 1);
        assert_eq!(result.time_in, Some(hm(8, 1)));
        assert_eq!(result.time_out, Some(hm(15, 32)));
        assert!(!result.reanchored);
    }

    #[test]
    fn test_time_in_is_closest_to_start_not_earliest() {
        let result = assign_shift(
            &[hm(6, 0), hm(7, 58), hm(16, 5)],
            Some(ShiftId::B),
            &catalog(),
            1,
        );
        assert_eq!(result.time_in, Some(hm(7, 58)));
        assert_eq!(result.time_out, Some(hm(16, 5)));
    }

    #[test]
    fn test_time_in_tie_goes_to_earlier_punch() {
        let result = assign_shift(&[hm(7, 50), hm(8, 10), hm(16, 0)], Some(ShiftId::B), &catalog(), 1);
        assert_eq!(result.time_in, Some(hm(7, 50)));
    }

    #[test]
    fn test_no_punches() {
        let result = assign_shift(&[], Some(ShiftId::B), &catalog(), 1);
        assert_eq!(result.time_in, None);
        assert_eq!(result.time_out, None);
        assert!(result.audit_step.reasoning.contains("No punches"));
    }

    #[test]
    fn test_single_punch_day_shift_has_no_time_out() {
        let result = assign_shift(&[hm(8, 5)], Some(ShiftId::B), &catalog(), 1);
        assert_eq!(result.time_in, Some(hm(8, 5)));
        assert_eq!(result.time_out, None);
    }

    #[test]
    fn test_single_punch_overnight_reanchors_to_shift_end() {
        let result = assign_shift(&[hm(20, 5)], Some(ShiftId::D), &catalog(), 1);
        assert_eq!(result.time_in, Some(hm(20, 5)));
        assert_eq!(result.time_out, Some(hm(4, 0)));
        assert!(result.reanchored);
    }

    #[test]
    fn test_overnight_exit_after_midnight_reanchors() {
        // By minute of day 03:58 comes before the 20:05 arrival, so it is not trusted.
        let result = assign_shift(&[hm(3, 58), hm(20, 5)], Some(ShiftId::D), &catalog(), 1);
        assert_eq!(result.time_in, Some(hm(20, 5)));
        assert_eq!(result.time_out, Some(hm(4, 0)));
        assert!(result.reanchored);
    }

    #[test]
    fn test_overnight_early_morning_scan_reanchors() {
        let result = assign_shift(&[hm(2, 0), hm(20, 5)], Some(ShiftId::D), &catalog(), 1);
        assert_eq!(result.time_in, Some(hm(20, 5)));
        assert_eq!(result.time_out, Some(hm(4, 0)));
        assert!(result.reanchored);
    }

    #[test]
    fn test_overnight_afternoon_punch_reanchors() {
        let result = assign_shift(&[hm(13, 0), hm(20, 5)], Some(ShiftId::D), &catalog(), 1);
        assert_eq!(result.time_in, Some(hm(20, 5)));
        assert_eq!(result.time_out, Some(hm(4, 0)));
        assert!(result.reanchored);
    }

    #[test]
    fn test_overnight_exit_before_midnight_is_trusted() {
        let result = assign_shift(&[hm(20, 5), hm(23, 50)], Some(ShiftId::D), &catalog(), 1);
        assert_eq!(result.time_out, Some(hm(23, 50)));
        assert!(!result.reanchored);
    }

    #[test]
    fn test_audit_step_records_assignment() {
        let result = assign_shift(&[hm(8, 1), hm(15, 32)], None, &catalog(), 4);
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_id, "shift_assignment");
        assert_eq!(result.audit_step.output["shift"], "B");
        assert_eq!(result.audit_step.output["source"]["source"], "fallback");
        assert_eq!(result.audit_step.output["time_in"], "08:01");
        assert_eq!(result.audit_step.output["time_out"], "15:32");
    }
}
