//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the shift
//! catalog and reconciliation policy from YAML files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{ShiftDefinition, ShiftId};

use super::types::{EngineConfig, ReconcilePolicy, ShiftCatalog, ShiftsConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/attendance/
/// ├── shifts.yaml   # Shift catalog and fallback shift (required)
/// └── policy.yaml   # Dedupe, noise-floor and overtime thresholds (optional)
/// ```
///
/// Any problem in these files is reported from [`ConfigLoader::load`], so a
/// broken catalog stops the process at startup rather than mid-import.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
/// use attendance_engine::models::ShiftId;
///
/// let loader = ConfigLoader::load("./config/attendance").unwrap();
/// let shift = loader.get_shift(ShiftId::B).unwrap();
/// println!("Shift {} starts at {}", shift.id, shift.start_minute);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `shifts.yaml` is missing
    /// - Any file contains invalid YAML
    /// - A shift definition is inconsistent, duplicated, or the fallback is missing
    /// - A policy threshold is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let shifts_path = path.join("shifts.yaml");
        let shifts_config = Self::load_yaml::<ShiftsConfig>(&shifts_path)?;

        let definitions = shifts_config
            .shifts
            .into_iter()
            .map(|entry| entry.into_definition())
            .collect::<EngineResult<Vec<_>>>()?;
        let catalog = ShiftCatalog::new(definitions, shifts_config.fallback)?;

        let policy_path = path.join("policy.yaml");
        let policy = if policy_path.exists() {
            Self::load_yaml::<ReconcilePolicy>(&policy_path)?
        } else {
            debug!(path = %policy_path.display(), "No policy file, using default thresholds");
            ReconcilePolicy::default()
        };
        policy.validate()?;

        info!(
            shifts = catalog.len(),
            fallback = %catalog.fallback().id,
            "Loaded attendance configuration"
        );

        Ok(Self {
            config: EngineConfig::new(catalog, policy),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the engine configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }

    /// Gets a shift definition by id.
    ///
    /// Returns `ShiftNotFound` when the catalog does not define the shift.
    pub fn get_shift(&self, id: ShiftId) -> EngineResult<&Arc<ShiftDefinition>> {
        self.config
            .catalog()
            .get(id)
            .ok_or_else(|| EngineError::ShiftNotFound {
                shift_id: id.to_string(),
            })
    }
}
