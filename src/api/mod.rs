//! HTTP API module for the attendance reconciliation engine.
//!
//! This module exposes batch reconciliation and the shift catalog over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{create_router, MAX_BODY_BYTES, MAX_ROWS_PER_REQUEST};
pub use request::{ReconcileRequest, RowRequest, TimeField};
pub use response::{ApiError, ApiErrorResponse, ReconcileResponse, RecordResponse};
pub use state::AppState;
