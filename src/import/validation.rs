//! Row validation applied before reconciliation.

use serde::{Deserialize, Serialize};

use crate::models::AttendanceRow;

/// Shortest accepted employee id.
pub const EMPLOYEE_ID_MIN_LEN: usize = 6;

/// Longest accepted employee id.
pub const EMPLOYEE_ID_MAX_LEN: usize = 10;

/// A row that was not reconciled, with the reason shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based position of the row in the batch.
    pub row_number: usize,
    /// The employee id as given.
    pub employee_id: String,
    /// Why the row was skipped.
    pub reason: String,
}

/// Checks that an employee id is 6 to 10 ASCII digits.
///
/// ```
/// use attendance_engine::import::is_valid_employee_id;
///
/// assert!(is_valid_employee_id("1002345"));
/// assert!(!is_valid_employee_id("12345"));
/// assert!(!is_valid_employee_id("10023X5"));
/// ```
pub fn is_valid_employee_id(id: &str) -> bool {
    (EMPLOYEE_ID_MIN_LEN..=EMPLOYEE_ID_MAX_LEN).contains(&id.len())
        && id.bytes().all(|b| b.is_ascii_digit())
}

/// Validates a row, returning the skip reason when it must not be reconciled.
pub fn validate_row(row: &AttendanceRow) -> Result<(), String> {
    if !is_valid_employee_id(&row.employee_id) {
        return Err(format!(
            "Invalid employee id '{}': expected {} to {} digits",
            row.employee_id, EMPLOYEE_ID_MIN_LEN, EMPLOYEE_ID_MAX_LEN
        ));
    }
    Ok(())
}
