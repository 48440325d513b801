//! Core data models for the attendance reconciliation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod punch;
mod record;
mod row;
mod shift;

pub use punch::{MINUTES_PER_DAY, PunchMinute};
pub use record::{
    AttendanceStatus, EmployeeShiftRecord, ReconcileStep, ReconcileWarning, RecordDate,
    RecordDisplay, WarningCode,
};
pub use row::AttendanceRow;
pub use shift::{ShiftDefinition, ShiftId, UnknownShiftLabel};
