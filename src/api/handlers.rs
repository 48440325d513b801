//! HTTP request handlers for the attendance reconciliation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::import::{reconcile_batch_parallel, CancellationFlag};
use crate::models::{AttendanceRow, ShiftDefinition, ShiftId};

use super::request::ReconcileRequest;
use super::response::{ApiError, ApiErrorResponse, ReconcileResponse, RecordResponse};
use super::state::AppState;

/// Upper bound on rows accepted in a single `/reconcile` request.
pub const MAX_ROWS_PER_REQUEST: usize = 50_000;

/// Upper bound on the request body size in bytes.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reconcile", post(reconcile_handler))
        .route("/shifts", get(list_shifts_handler))
        .route("/shifts/:id", get(get_shift_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Cancels the batch when the handler future is dropped, e.g. because the
/// client disconnected.
struct CancelOnDrop(CancellationFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

fn json_error(api_error: ApiErrorResponse) -> Response {
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Handler for POST /reconcile endpoint.
///
/// Accepts a batch of extracted rows and returns one record per accepted row.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconcile request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_error(ApiErrorResponse::bad_request(error));
        }
    };

    if request.rows.len() > MAX_ROWS_PER_REQUEST {
        warn!(
            correlation_id = %correlation_id,
            rows = request.rows.len(),
            "Too many rows in request"
        );
        return json_error(ApiErrorResponse::bad_request(ApiError::with_details(
            "VALIDATION_ERROR",
            "Too many rows in request",
            format!(
                "{} rows submitted, at most {} are accepted",
                request.rows.len(),
                MAX_ROWS_PER_REQUEST
            ),
        )));
    }

    let locale = request.locale;
    let rows: Vec<AttendanceRow> = request.rows.into_iter().map(Into::into).collect();
    let row_count = rows.len();

    let cancel = CancellationFlag::new();
    let _guard = CancelOnDrop(cancel.clone());

    let start_time = Instant::now();
    let outcome =
        reconcile_batch_parallel(rows, Arc::clone(state.config()), cancel, state.workers()).await;

    info!(
        correlation_id = %correlation_id,
        rows = row_count,
        records = outcome.records.len(),
        skipped = outcome.skipped.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Reconciliation completed"
    );

    let records = outcome
        .records
        .into_iter()
        .map(|record| {
            let display = record.display(locale);
            RecordResponse { record, display }
        })
        .collect();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(ReconcileResponse {
            correlation_id,
            records,
            skipped: outcome.skipped,
            cancelled: outcome.cancelled,
            unprocessed: outcome.unprocessed,
        }),
    )
        .into_response()
}

/// Handler for GET /shifts endpoint.
///
/// Lists the shift catalog in configured order.
async fn list_shifts_handler(State(state): State<AppState>) -> Json<Vec<ShiftDefinition>> {
    let shifts = state
        .config()
        .catalog()
        .iter()
        .map(|shift| shift.as_ref().clone())
        .collect();
    Json(shifts)
}

/// Handler for GET /shifts/:id endpoint.
async fn get_shift_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let shift_id = match id.parse::<ShiftId>() {
        Ok(shift_id) => shift_id,
        Err(err) => {
            warn!(label = %id, "Unknown shift label requested");
            return json_error(ApiErrorResponse::bad_request(ApiError::validation_error(
                err.to_string(),
            )));
        }
    };

    match state.config().catalog().get(shift_id) {
        Some(shift) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(shift.as_ref().clone()),
        )
            .into_response(),
        None => json_error(
            EngineError::ShiftNotFound {
                shift_id: shift_id.to_string(),
            }
            .into(),
        ),
    }
}
