//! Batch import processing.
//!
//! Rows arriving from the spreadsheet extractor are validated here, then
//! reconciled one employee-day at a time. Rows that cannot be processed are
//! reported as [`SkippedRow`]s with a reason instead of aborting the import.

mod batch;
mod validation;

pub use batch::{BatchOutcome, CancellationFlag, reconcile_batch, reconcile_batch_parallel};
pub use validation::{
    EMPLOYEE_ID_MAX_LEN, EMPLOYEE_ID_MIN_LEN, SkippedRow, is_valid_employee_id, validate_row,
};
