//! Work-duration calculation between time-in and time-out.

use tracing::warn;

use crate::models::{MINUTES_PER_DAY, PunchMinute, ReconcileStep};

/// The result of a work-duration calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkMinutesResult {
    /// Minutes worked, after wraparound and the noise floor.
    pub work_minutes: u32,
    /// True when the span crossed midnight.
    pub wrapped: bool,
    /// The audit step recording this calculation.
    pub audit_step: ReconcileStep,
}

/// Computes the minutes between `time_in` and `time_out`.
///
/// A negative difference means the span crossed midnight, and a day is added.
/// Durations below `noise_floor_minutes` are reported as zero: a double badge
/// at a shift boundary is not work.
///
/// `is_overnight` is the caller's statement that the shift may cross
/// midnight; a crossing on a day shift is still computed but logged.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::calculate_work_minutes;
/// use attendance_engine::models::PunchMinute;
///
/// let hm = |h, m| PunchMinute::from_hm(h, m).unwrap();
/// let result = calculate_work_minutes(hm(20, 5), hm(4, 0), true, 5, 1);
/// assert_eq!(result.work_minutes, 475);
/// assert!(result.wrapped);
/// ```
pub fn calculate_work_minutes(
    time_in: PunchMinute,
    time_out: PunchMinute,
    is_overnight: bool,
    noise_floor_minutes: u32,
    step_number: u32,
) -> WorkMinutesResult {
    let raw = i32::from(time_out.get()) - i32::from(time_in.get());
    let wrapped = raw < 0;
    let span = if wrapped {
        raw + i32::from(MINUTES_PER_DAY)
    } else {
        raw
    };
    let span = span.unsigned_abs();

    if wrapped && !is_overnight {
        warn!(
            time_in = %time_in,
            time_out = %time_out,
            "Time-out precedes time-in on a day shift; treating as a midnight crossing"
        );
    }

    let below_floor = span < noise_floor_minutes;
    let work_minutes = if below_floor { 0 } else { span };

    let reasoning = if below_floor {
        format!(
            "{} to {} spans {} minutes, under the {} minute noise floor; reported as 0",
            time_in, time_out, span, noise_floor_minutes
        )
    } else if wrapped {
        format!(
            "{} to {} crosses midnight: {} + 1440 = {} minutes",
            time_in, time_out, raw, span
        )
    } else {
        format!("{} to {} = {} minutes", time_in, time_out, span)
    };

    let audit_step = ReconcileStep {
        step_number,
        rule_id: "work_minutes".to_string(),
        rule_name: "Work Duration".to_string(),
        input: serde_json::json!({
            "time_in": time_in.to_string(),
            "time_out": time_out.to_string(),
            "is_overnight": is_overnight,
            "noise_floor_minutes": noise_floor_minutes,
        }),
        output: serde_json::json!({
            "work_minutes": work_minutes,
            "wrapped": wrapped,
        }),
        reasoning,
    };

    WorkMinutesResult {
        work_minutes,
        wrapped,
        audit_step,
    }
}
