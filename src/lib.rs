//! Time & attendance reconciliation engine
//!
//! This crate turns raw biometric punch logs, one spreadsheet row per
//! employee-day, into reconciled shift records: the clean punch list, the
//! assigned shift, time-in and time-out, worked and overtime minutes, and an
//! attendance status, each with an audit trail of how it was derived.
//!
//! The engine is pure computation. Rows are reconciled independently, so
//! batches can be split across workers sharing only the read-only
//! [`config::EngineConfig`].
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::calculation::reconcile_day;
//! use attendance_engine::config::ConfigLoader;
//! use attendance_engine::models::{AttendanceRow, AttendanceStatus};
//!
//! let loader = ConfigLoader::load("./config/attendance").unwrap();
//! let row = AttendanceRow {
//!     employee_id: "1002345".to_string(),
//!     employee_name: "Somchai K.".to_string(),
//!     department: "Warehouse".to_string(),
//!     date: "05/01/2567".to_string(),
//!     time: "08:01 15:32 15:32".to_string(),
//!     shift: Some("B".to_string()),
//! };
//!
//! let config = loader.config();
//! let record = reconcile_day(&row, config.catalog(), config.policy());
//! assert_eq!(record.work_minutes, 451);
//! assert_eq!(record.status, AttendanceStatus::Present);
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod codec;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
