//! Configuration loading and management for the attendance engine.
//!
//! The shift catalog and the reconciliation thresholds are loaded from YAML
//! files and passed explicitly into every reconciliation entry point.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/attendance").unwrap();
//! println!("Fallback shift: {}", config.config().catalog().fallback().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_DEDUPE_THRESHOLD_MINUTES, DEFAULT_OVERTIME_CAP_MINUTES,
    DEFAULT_WORK_NOISE_FLOOR_MINUTES, EngineConfig, ReconcilePolicy, ShiftCatalog,
    ShiftEntryConfig, ShiftsConfig,
};
