//! Configuration types for attendance reconciliation.
//!
//! The raw `*Config` structures are deserialized from YAML; [`ShiftCatalog`]
//! and [`ReconcilePolicy`] are the validated forms the engine consumes.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::{TimeToken, parse_time};
use crate::error::{EngineError, EngineResult};
use crate::models::{MINUTES_PER_DAY, PunchMinute, ShiftDefinition, ShiftId};

/// Default distance, in minutes, under which two scans count as one punch.
pub const DEFAULT_DEDUPE_THRESHOLD_MINUTES: u16 = 2;

/// Default work duration, in minutes, below which a day counts as zero work.
pub const DEFAULT_WORK_NOISE_FLOOR_MINUTES: u32 = 5;

/// Default maximum overtime per employee-day (5 hours).
pub const DEFAULT_OVERTIME_CAP_MINUTES: u32 = 300;

/// One shift entry as written in `shifts.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftEntryConfig {
    /// The shift identifier.
    pub id: ShiftId,
    /// Human-readable name.
    pub name: String,
    /// Window start, `HH:MM`.
    pub start: String,
    /// Window end, `HH:MM`.
    pub end: String,
    /// Whether the window wraps through midnight.
    #[serde(default)]
    pub overnight: bool,
    /// Overtime boundary, `HH:MM`. Defaults to the window end.
    #[serde(default)]
    pub overtime_boundary: Option<String>,
    /// Late threshold, `HH:MM`.
    pub late_threshold: String,
}

/// Structure of `shifts.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftsConfig {
    /// Shift used when a row carries no usable hint.
    pub fallback: ShiftId,
    /// The shift entries.
    pub shifts: Vec<ShiftEntryConfig>,
}

impl ShiftEntryConfig {
    /// Converts the entry into a validated [`ShiftDefinition`].
    pub fn into_definition(self) -> EngineResult<ShiftDefinition> {
        let id = self.id;
        // Only HH:MM is accepted here; fractional-day values are an import format.
        let minute = |field: &str, raw: &str| {
            let parsed = match parse_time(raw) {
                token @ TimeToken::Colon { .. } => token.minute(),
                _ => None,
            };
            parsed.ok_or_else(|| EngineError::InvalidShiftDefinition {
                shift_id: id.to_string(),
                message: format!("{} '{}' is not an HH:MM time", field, raw),
            })
        };

        let start_minute = minute("start", &self.start)?;
        let end_minute = minute("end", &self.end)?;
        let overtime_boundary_minute = match &self.overtime_boundary {
            Some(raw) => minute("overtime_boundary", raw)?,
            None => end_minute,
        };
        let late_threshold_minute = minute("late_threshold", &self.late_threshold)?;

        let definition = ShiftDefinition {
            id,
            name: self.name,
            start_minute,
            end_minute,
            is_overnight: self.overnight,
            overtime_boundary_minute,
            late_threshold_minute,
        };
        validate_definition(&definition)?;
        Ok(definition)
    }
}

fn validate_definition(definition: &ShiftDefinition) -> EngineResult<()> {
    let invalid = |message: &str| EngineError::InvalidShiftDefinition {
        shift_id: definition.id.to_string(),
        message: message.to_string(),
    };

    if definition.start_minute == definition.end_minute {
        return Err(invalid("start and end must differ"));
    }

    let wraps = definition.end_minute < definition.start_minute;
    if wraps != definition.is_overnight {
        return Err(invalid(if wraps {
            "window ends before it starts but is not marked overnight"
        } else {
            "marked overnight but the window does not cross midnight"
        }));
    }

    Ok(())
}

/// Tunable thresholds of the reconciliation stages, from `policy.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilePolicy {
    /// Scans within this many minutes of their predecessor are merged.
    pub dedupe_threshold_minutes: u16,
    /// Work durations below this are reported as zero.
    pub work_noise_floor_minutes: u32,
    /// Maximum overtime credited per employee-day.
    pub overtime_cap_minutes: u32,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            dedupe_threshold_minutes: DEFAULT_DEDUPE_THRESHOLD_MINUTES,
            work_noise_floor_minutes: DEFAULT_WORK_NOISE_FLOOR_MINUTES,
            overtime_cap_minutes: DEFAULT_OVERTIME_CAP_MINUTES,
        }
    }
}

impl ReconcilePolicy {
    /// Checks that every threshold fits inside a day.
    pub fn validate(&self) -> EngineResult<()> {
        let day = u32::from(MINUTES_PER_DAY);
        let checks = [
            (
                "dedupe_threshold_minutes",
                u32::from(self.dedupe_threshold_minutes),
            ),
            ("work_noise_floor_minutes", self.work_noise_floor_minutes),
            ("overtime_cap_minutes", self.overtime_cap_minutes),
        ];

        for (field, value) in checks {
            if value >= day {
                return Err(EngineError::InvalidPolicy {
                    field: field.to_string(),
                    message: format!("{} must be less than {}", value, day),
                });
            }
        }
        Ok(())
    }
}

/// The registry of shift definitions.
///
/// Definitions are shared through [`Arc`], so records reference the catalog's
/// definition instead of copying it. The fallback shift is guaranteed to be
/// present once a catalog has been constructed.
///
/// # Example
///
/// ```
/// use attendance_engine::config::ShiftCatalog;
/// use attendance_engine::models::{PunchMinute, ShiftDefinition, ShiftId};
///
/// let hm = |h, m| PunchMinute::from_hm(h, m).unwrap();
/// let catalog = ShiftCatalog::new(
///     vec![ShiftDefinition {
///         id: ShiftId::B,
///         name: "Day".to_string(),
///         start_minute: hm(8, 0),
///         end_minute: hm(16, 0),
///         is_overnight: false,
///         overtime_boundary_minute: hm(16, 0),
///         late_threshold_minute: hm(8, 30),
///     }],
///     ShiftId::B,
/// )
/// .unwrap();
///
/// assert_eq!(catalog.fallback().id, ShiftId::B);
/// assert!(catalog.get(ShiftId::D).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ShiftCatalog {
    shifts: Vec<Arc<ShiftDefinition>>,
    fallback_index: usize,
}

impl ShiftCatalog {
    /// Builds a catalog, rejecting duplicate ids and a missing fallback.
    pub fn new(definitions: Vec<ShiftDefinition>, fallback: ShiftId) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            validate_definition(definition)?;
            if !seen.insert(definition.id) {
                return Err(EngineError::DuplicateShift {
                    shift_id: definition.id.to_string(),
                });
            }
        }

        let fallback_index = definitions
            .iter()
            .position(|d| d.id == fallback)
            .ok_or_else(|| EngineError::MissingFallbackShift {
                shift_id: fallback.to_string(),
            })?;

        Ok(Self {
            shifts: definitions.into_iter().map(Arc::new).collect(),
            fallback_index,
        })
    }

    /// Looks up a shift by id.
    pub fn get(&self, id: ShiftId) -> Option<&Arc<ShiftDefinition>> {
        self.shifts.iter().find(|s| s.id == id)
    }

    /// Returns the fallback shift.
    pub fn fallback(&self) -> &Arc<ShiftDefinition> {
        &self.shifts[self.fallback_index]
    }

    /// Iterates over the shifts in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ShiftDefinition>> {
        self.shifts.iter()
    }

    /// Returns the number of shifts.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Returns true if the catalog is empty. A constructed catalog never is.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    catalog: ShiftCatalog,
    policy: ReconcilePolicy,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(catalog: ShiftCatalog, policy: ReconcilePolicy) -> Self {
        Self { catalog, policy }
    }

    /// Returns the shift catalog.
    pub fn catalog(&self) -> &ShiftCatalog {
        &self.catalog
    }

    /// Returns the reconciliation policy.
    pub fn policy(&self) -> &ReconcilePolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: ShiftId, start: &str, end: &str, overnight: bool) -> ShiftEntryConfig {
        ShiftEntryConfig {
            id,
            name: format!("Shift {}", id),
            start: start.to_string(),
            end: end.to_string(),
            overnight,
            overtime_boundary: None,
            late_threshold: start.to_string(),
        }
    }

    #[test]
    fn test_entry_defaults_overtime_boundary_to_end() {
        let definition = entry(ShiftId::B, "08:00", "16:00", false)
            .into_definition()
            .unwrap();
        assert_eq!(definition.overtime_boundary_minute.get(), 960);
    }

    #[test]
    fn test_entry_rejects_bad_time() {
        let result = entry(ShiftId::A, "8am", "17:00", false).into_definition();
        match result {
            Err(EngineError::InvalidShiftDefinition { shift_id, message }) => {
                assert_eq!(shift_id, "A");
                assert!(message.contains("start"));
            }
            other => panic!("Expected InvalidShiftDefinition, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_rejects_fractional_day_time() {
        let result = entry(ShiftId::B, "0.5", "16:00", false).into_definition();
        match result {
            Err(EngineError::InvalidShiftDefinition { shift_id, message }) => {
                assert_eq!(shift_id, "B");
                assert!(message.contains("'0.5'"));
            }
            other => panic!("Expected InvalidShiftDefinition, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_rejects_unflagged_wrap() {
        let result = entry(ShiftId::D, "20:00", "04:00", false).into_definition();
        assert!(matches!(
            result,
            Err(EngineError::InvalidShiftDefinition { .. })
        ));
    }

    #[test]
    fn test_entry_rejects_overnight_flag_on_day_window() {
        let result = entry(ShiftId::A, "08:00", "17:00", true).into_definition();
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let b = entry(ShiftId::B, "08:00", "16:00", false)
            .into_definition()
            .unwrap();
        let result = ShiftCatalog::new(vec![b.clone(), b], ShiftId::B);
        assert!(matches!(result, Err(EngineError::DuplicateShift { .. })));
    }

    #[test]
    fn test_catalog_requires_fallback() {
        let a = entry(ShiftId::A, "08:00", "17:00", false)
            .into_definition()
            .unwrap();
        let result = ShiftCatalog::new(vec![a], ShiftId::B);
        match result {
            Err(EngineError::MissingFallbackShift { shift_id }) => assert_eq!(shift_id, "B"),
            other => panic!("Expected MissingFallbackShift, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_shares_definitions() {
        let b = entry(ShiftId::B, "08:00", "16:00", false)
            .into_definition()
            .unwrap();
        let catalog = ShiftCatalog::new(vec![b], ShiftId::B).unwrap();
        let first = Arc::clone(catalog.fallback());
        let second = Arc::clone(catalog.get(ShiftId::B).unwrap());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_default_policy() {
        let policy = ReconcilePolicy::default();
        assert_eq!(policy.dedupe_threshold_minutes, 2);
        assert_eq!(policy.work_noise_floor_minutes, 5);
        assert_eq!(policy.overtime_cap_minutes, 300);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_policy_rejects_day_sized_values() {
        let policy = ReconcilePolicy {
            overtime_cap_minutes: 1440,
            ..ReconcilePolicy::default()
        };
        match policy.validate() {
            Err(EngineError::InvalidPolicy { field, .. }) => {
                assert_eq!(field, "overtime_cap_minutes")
            }
            other => panic!("Expected InvalidPolicy, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_policy_yaml_uses_defaults() {
        let policy: ReconcilePolicy = serde_yaml::from_str("overtime_cap_minutes: 240").unwrap();
        assert_eq!(policy.overtime_cap_minutes, 240);
        assert_eq!(policy.dedupe_threshold_minutes, 2);
    }
}
