//! Batch reconciliation of imported rows.
//!
//! Employee-days are independent, so a batch can be split across workers
//! with nothing shared but the read-only configuration. Cancellation is
//! checked before every row: records already computed are kept and the
//! remaining rows are left unprocessed.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::calculation::reconcile_day;
use crate::config::EngineConfig;
use crate::models::{AttendanceRow, EmployeeShiftRecord};

use super::validation::{SkippedRow, validate_row};

/// A shared flag that stops a running batch at the next row boundary.
///
/// ```
/// use attendance_engine::import::CancellationFlag;
///
/// let flag = CancellationFlag::new();
/// let handle = flag.clone();
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a flag that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The result of reconciling a batch of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Records for the accepted rows, in input order.
    pub records: Vec<EmployeeShiftRecord>,
    /// Rows rejected at validation or that failed to reconcile.
    pub skipped: Vec<SkippedRow>,
    /// True if the batch was cancelled before every row was processed.
    pub cancelled: bool,
    /// Number of rows not looked at because of cancellation.
    pub unprocessed: usize,
}

impl BatchOutcome {
    fn merge(&mut self, other: BatchOutcome) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped);
        self.cancelled |= other.cancelled;
        self.unprocessed += other.unprocessed;
    }
}

/// Reconciles a batch of rows on the calling thread.
///
/// Rows with an invalid employee id are skipped with a reason; a row that
/// fails to reconcile is skipped as well and does not affect its neighbours.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
/// use attendance_engine::import::{reconcile_batch, CancellationFlag};
/// use attendance_engine::models::AttendanceRow;
///
/// let loader = ConfigLoader::load("./config/attendance").unwrap();
/// let rows = vec![AttendanceRow {
///     employee_id: "bad".to_string(),
///     employee_name: "Test".to_string(),
///     department: String::new(),
///     date: "2024-01-05".to_string(),
///     time: "08:00 16:00".to_string(),
///     shift: None,
/// }];
///
/// let outcome = reconcile_batch(&rows, loader.config(), &CancellationFlag::new());
/// assert!(outcome.records.is_empty());
/// assert_eq!(outcome.skipped[0].row_number, 1);
/// ```
pub fn reconcile_batch(
    rows: &[AttendanceRow],
    config: &EngineConfig,
    cancel: &CancellationFlag,
) -> BatchOutcome {
    let outcome = reconcile_rows(rows, 0, config, cancel);
    info!(
        rows = rows.len(),
        records = outcome.records.len(),
        skipped = outcome.skipped.len(),
        cancelled = outcome.cancelled,
        "Batch reconciliation finished"
    );
    outcome
}

/// Reconciles a batch across up to `workers` blocking tasks.
///
/// Rows are split into contiguous chunks, one per task, and the chunk
/// outcomes are stitched back together in input order. A chunk whose task
/// fails has all of its rows reported as skipped.
pub async fn reconcile_batch_parallel(
    rows: Vec<AttendanceRow>,
    config: Arc<EngineConfig>,
    cancel: CancellationFlag,
    workers: usize,
) -> BatchOutcome {
    let total = rows.len();
    if total == 0 {
        return BatchOutcome::default();
    }

    let chunk_size = total.div_ceil(workers.max(1));
    let rows = Arc::new(rows);
    let mut tasks = JoinSet::new();

    for (chunk_index, start) in (0..total).step_by(chunk_size).enumerate() {
        let end = (start + chunk_size).min(total);
        let rows = Arc::clone(&rows);
        let config = Arc::clone(&config);
        let cancel = cancel.clone();

        tasks.spawn_blocking(move || {
            let outcome = reconcile_rows(&rows[start..end], start, &config, &cancel);
            (chunk_index, outcome)
        });
    }

    let chunk_count = total.div_ceil(chunk_size);
    let mut chunks: Vec<Option<BatchOutcome>> = vec![None; chunk_count];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((chunk_index, outcome)) => chunks[chunk_index] = Some(outcome),
            Err(err) => error!(error = %err, "Reconciliation worker failed"),
        }
    }

    let mut merged = BatchOutcome::default();
    for (chunk_index, chunk) in chunks.into_iter().enumerate() {
        match chunk {
            Some(outcome) => merged.merge(outcome),
            None => {
                let start = chunk_index * chunk_size;
                let end = (start + chunk_size).min(total);
                merged.skipped.extend(rows[start..end].iter().enumerate().map(|(i, row)| {
                    SkippedRow {
                        row_number: start + i + 1,
                        employee_id: row.employee_id.clone(),
                        reason: "Reconciliation worker failed".to_string(),
                    }
                }));
            }
        }
    }
    merged.skipped.sort_by_key(|s| s.row_number);

    info!(
        rows = total,
        workers = chunk_count,
        records = merged.records.len(),
        skipped = merged.skipped.len(),
        cancelled = merged.cancelled,
        "Parallel batch reconciliation finished"
    );
    merged
}

/// Reconciles a contiguous slice of a batch; `offset` is the slice's
/// position in the batch, used for row numbers.
fn reconcile_rows(
    rows: &[AttendanceRow],
    offset: usize,
    config: &EngineConfig,
    cancel: &CancellationFlag,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        let row_number = offset + index + 1;

        if cancel.is_cancelled() {
            outcome.cancelled = true;
            outcome.unprocessed = rows.len() - index;
            debug!(row_number, unprocessed = outcome.unprocessed, "Batch cancelled");
            break;
        }

        if let Err(reason) = validate_row(row) {
            warn!(row_number, employee_id = %row.employee_id, %reason, "Skipping row");
            outcome.skipped.push(SkippedRow {
                row_number,
                employee_id: row.employee_id.clone(),
                reason,
            });
            continue;
        }

        match catch_unwind(AssertUnwindSafe(|| {
            reconcile_day(row, config.catalog(), config.policy())
        })) {
            Ok(record) => outcome.records.push(record),
            Err(_) => {
                error!(row_number, employee_id = %row.employee_id, "Row reconciliation panicked");
                outcome.skipped.push(SkippedRow {
                    row_number,
                    employee_id: row.employee_id.clone(),
                    reason: "Internal error while reconciling row".to_string(),
                });
            }
        }
    }

    outcome
}
