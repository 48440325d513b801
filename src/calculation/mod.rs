//! Reconciliation logic for the attendance engine.
//!
//! This module contains the stages that turn a day's punches into a work
//! record: punch deduplication, shift assignment, work-duration and overtime
//! calculation, status classification, and [`reconcile_day`], which composes
//! them.

mod dedupe;
mod overtime;
mod record_builder;
mod shift_assignment;
mod status;
mod work_hours;

pub use dedupe::dedupe_punches;
pub use overtime::{OvertimeResult, PunchPair, calculate_overtime};
pub use record_builder::reconcile_day;
pub use shift_assignment::{ShiftAssignment, ShiftSource, assign_shift, resolve_shift};
pub use status::{StatusClassification, classify_attendance, classify_status};
pub use work_hours::{WorkMinutesResult, calculate_work_minutes};
