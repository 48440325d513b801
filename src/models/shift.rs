//! Shift identifiers and shift window definitions.
//!
//! A [`ShiftDefinition`] describes one scheduled window. Definitions are owned
//! by the [`ShiftCatalog`](crate::config::ShiftCatalog) and shared with the
//! records they are assigned to.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PunchMinute;

/// Identifier of a shift in the catalog.
///
/// Shift labels coming from import rows resolve through [`FromStr`], which
/// fails on anything that is not a known label rather than quietly picking a
/// default.
///
/// # Example
///
/// ```
/// use attendance_engine::models::ShiftId;
///
/// assert_eq!("b".parse::<ShiftId>().unwrap(), ShiftId::B);
/// assert!("Z".parse::<ShiftId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShiftId {
    /// Day shift, 08:00-17:00 in the standard catalog.
    A,
    /// Day shift, 08:00-16:00 in the standard catalog.
    B,
    /// Evening shift, 16:00-00:00 in the standard catalog.
    C,
    /// Night shift, 20:00-04:00 in the standard catalog.
    D,
    /// Early shift, 00:00-08:00 in the standard catalog.
    E,
}

impl ShiftId {
    /// Every shift id, in catalog order.
    pub const ALL: [ShiftId; 5] = [ShiftId::A, ShiftId::B, ShiftId::C, ShiftId::D, ShiftId::E];

    /// Returns the single-letter label.
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftId::A => "A",
            ShiftId::B => "B",
            ShiftId::C => "C",
            ShiftId::D => "D",
            ShiftId::E => "E",
        }
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a shift label does not name a known shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShiftLabel(pub String);

impl std::fmt::Display for UnknownShiftLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown shift label: {:?}", self.0)
    }
}

impl std::error::Error for UnknownShiftLabel {}

impl FromStr for ShiftId {
    type Err = UnknownShiftLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(ShiftId::A),
            "B" => Ok(ShiftId::B),
            "C" => Ok(ShiftId::C),
            "D" => Ok(ShiftId::D),
            "E" => Ok(ShiftId::E),
            _ => Err(UnknownShiftLabel(s.to_string())),
        }
    }
}

/// A scheduled shift window.
///
/// For overnight shifts `end_minute` is numerically smaller than
/// `start_minute` and the window wraps through midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// The shift identifier.
    pub id: ShiftId,
    /// Human-readable name of the shift.
    pub name: String,
    /// Scheduled start of the window.
    pub start_minute: PunchMinute,
    /// Scheduled end of the window.
    pub end_minute: PunchMinute,
    /// Whether the window wraps through midnight.
    pub is_overnight: bool,
    /// Minute of day past which worked time accrues as overtime.
    pub overtime_boundary_minute: PunchMinute,
    /// Minute of day after which an arrival counts as late.
    pub late_threshold_minute: PunchMinute,
}

impl ShiftDefinition {
    /// Scheduled length of the window in minutes, wrapping through midnight
    /// for overnight shifts.
    ///
    /// ```
    /// use attendance_engine::models::{PunchMinute, ShiftDefinition, ShiftId};
    ///
    /// let night = ShiftDefinition {
    ///     id: ShiftId::D,
    ///     name: "Night".to_string(),
    ///     start_minute: PunchMinute::from_hm(20, 0).unwrap(),
    ///     end_minute: PunchMinute::from_hm(4, 0).unwrap(),
    ///     is_overnight: true,
    ///     overtime_boundary_minute: PunchMinute::from_hm(4, 0).unwrap(),
    ///     late_threshold_minute: PunchMinute::from_hm(20, 30).unwrap(),
    /// };
    /// assert_eq!(night.scheduled_minutes(), 480);
    /// ```
    pub fn scheduled_minutes(&self) -> u16 {
        let start = self.start_minute.get();
        let end = self.end_minute.get();
        if end >= start {
            end - start
        } else {
            end + super::MINUTES_PER_DAY - start
        }
    }

    /// Places a minute of day on this shift's working timeline.
    ///
    /// Day shifts use the clock as is. For an overnight shift, minutes in the
    /// earlier half of the off-duty gap (between the window end and the next
    /// start) belong to the morning after, so they move one day forward.
    /// Overtime pairs punches in this order so that a morning exit follows
    /// the evening arrival.
    ///
    /// ```
    /// use attendance_engine::models::{PunchMinute, ShiftDefinition, ShiftId};
    ///
    /// let hm = |h, m| PunchMinute::from_hm(h, m).unwrap();
    /// let night = ShiftDefinition {
    ///     id: ShiftId::D,
    ///     name: "Night".to_string(),
    ///     start_minute: hm(20, 0),
    ///     end_minute: hm(4, 0),
    ///     is_overnight: true,
    ///     overtime_boundary_minute: hm(4, 0),
    ///     late_threshold_minute: hm(20, 30),
    /// };
    /// assert!(night.timeline_position(hm(3, 50)) > night.timeline_position(hm(20, 5)));
    /// assert_eq!(night.timeline_position(hm(14, 0)), 840);
    /// ```
    pub fn timeline_position(&self, minute: PunchMinute) -> u32 {
        let minute = u32::from(minute.get());
        if !self.is_overnight {
            return minute;
        }

        let end = u32::from(self.end_minute.get());
        let start = u32::from(self.start_minute.get());
        let pivot = end + start.saturating_sub(end) / 2;
        if minute < pivot {
            minute + u32::from(super::MINUTES_PER_DAY)
        } else {
            minute
        }
    }
}
