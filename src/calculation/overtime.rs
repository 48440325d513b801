//! Overtime calculation against a shift's overtime boundary.
//!
//! Punches are paired in order into in/out intervals and only the part of
//! each interval past the boundary counts. Subtracting first arrival from
//! last departure would also credit time spent outside (lunch, errands)
//! between intervals.

use serde::Serialize;

use crate::models::{PunchMinute, ReconcileStep, ShiftDefinition};

/// One in/out interval and the overtime it contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PunchPair {
    /// Entry punch.
    pub time_in: PunchMinute,
    /// Exit punch.
    pub time_out: PunchMinute,
    /// Minutes of this interval past the overtime boundary.
    pub overtime_minutes: u32,
}

/// The result of an overtime calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeResult {
    /// Overtime after the cap.
    pub overtime_minutes: u32,
    /// Overtime before the cap.
    pub uncapped_minutes: u32,
    /// The intervals the punches were paired into.
    pub pairs: Vec<PunchPair>,
    /// The audit step recording this calculation.
    pub audit_step: ReconcileStep,
}

impl OvertimeResult {
    /// Returns true if the cap reduced the overtime.
    pub fn capped(&self) -> bool {
        self.uncapped_minutes > self.overtime_minutes
    }
}

/// Calculates overtime for an employee-day.
///
/// Punches are sorted on the shift timeline and paired as
/// `(p0, p1), (p2, p3), ...`; a trailing unpaired punch contributes nothing.
/// On an overnight shift the timeline already carries after-midnight punches
/// into the next day, so a pair that spans midnight is measured correctly.
/// For every pair whose exit lies at or past the overtime boundary, the
/// minutes beyond the boundary accrue. The sum is clamped to `cap_minutes`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_overtime;
/// use attendance_engine::models::{PunchMinute, ShiftDefinition, ShiftId};
///
/// let hm = |h, m| PunchMinute::from_hm(h, m).unwrap();
/// let shift_b = ShiftDefinition {
///     id: ShiftId::B,
///     name: "Day B".to_string(),
///     start_minute: hm(8, 0),
///     end_minute: hm(16, 0),
///     is_overnight: false,
///     overtime_boundary_minute: hm(16, 0),
///     late_threshold_minute: hm(8, 30),
/// };
///
/// let result = calculate_overtime(&shift_b, &[hm(8, 0), hm(19, 22)], 300, 1);
/// assert_eq!(result.overtime_minutes, 202);
/// ```
pub fn calculate_overtime(
    shift: &ShiftDefinition,
    punches: &[PunchMinute],
    cap_minutes: u32,
    step_number: u32,
) -> OvertimeResult {
    let boundary = shift.timeline_position(shift.overtime_boundary_minute);

    let mut placed: Vec<(u32, PunchMinute)> = punches
        .iter()
        .map(|p| (shift.timeline_position(*p), *p))
        .collect();
    placed.sort_unstable();

    let pairs: Vec<PunchPair> = placed
        .chunks_exact(2)
        .map(|pair| {
            let (enter, time_in) = pair[0];
            let (exit, time_out) = pair[1];
            let overtime_minutes = if exit >= boundary {
                exit - enter.max(boundary)
            } else {
                0
            };

            PunchPair {
                time_in,
                time_out,
                overtime_minutes,
            }
        })
        .collect();

    let uncapped_minutes: u32 = pairs.iter().map(|p| p.overtime_minutes).sum();
    let overtime_minutes = uncapped_minutes.min(cap_minutes);

    let reasoning = if pairs.is_empty() {
        format!(
            "{} punch(es) form no in/out pair; no overtime",
            punches.len()
        )
    } else if uncapped_minutes > cap_minutes {
        format!(
            "{} minutes past boundary {} across {} pair(s), capped at {}",
            uncapped_minutes,
            shift.overtime_boundary_minute,
            pairs.len(),
            cap_minutes
        )
    } else {
        format!(
            "{} minutes past boundary {} across {} pair(s)",
            uncapped_minutes,
            shift.overtime_boundary_minute,
            pairs.len()
        )
    };

    let audit_step = ReconcileStep {
        step_number,
        rule_id: "overtime".to_string(),
        rule_name: "Overtime Past Shift Boundary".to_string(),
        input: serde_json::json!({
            "shift": shift.id.to_string(),
            "overtime_boundary": shift.overtime_boundary_minute.to_string(),
            "punches": punches.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            "cap_minutes": cap_minutes,
        }),
        output: serde_json::json!({
            "pairs": pairs
                .iter()
                .map(|p| serde_json::json!({
                    "time_in": p.time_in.to_string(),
                    "time_out": p.time_out.to_string(),
                    "overtime_minutes": p.overtime_minutes,
                }))
                .collect::<Vec<_>>(),
            "uncapped_minutes": uncapped_minutes,
            "overtime_minutes": overtime_minutes,
        }),
        reasoning,
    };

    OvertimeResult {
        overtime_minutes,
        uncapped_minutes,
        pairs,
        audit_step,
    }
}
