//! The canonical minute-of-day representation of a clock punch.

use serde::{Deserialize, Serialize};

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A clock punch expressed as minutes since midnight, always in `[0, 1439]`.
///
/// Every stage after the time codec works exclusively with this type, so an
/// out-of-range value can never reach the arithmetic.
///
/// # Example
///
/// ```
/// use attendance_engine::models::PunchMinute;
///
/// let punch = PunchMinute::from_hm(8, 30).unwrap();
/// assert_eq!(punch.get(), 510);
/// assert_eq!(punch.to_string(), "08:30");
/// assert!(PunchMinute::new(1440).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct PunchMinute(u16);

impl PunchMinute {
    /// Midnight (00:00).
    pub const MIDNIGHT: PunchMinute = PunchMinute(0);

    /// Creates a punch minute, returning `None` when `minute` is 1440 or more.
    pub fn new(minute: u16) -> Option<Self> {
        (minute < MINUTES_PER_DAY).then_some(Self(minute))
    }

    /// Creates a punch minute from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Returns the raw minute count.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the hour component.
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Returns the minute-within-hour component.
    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Absolute distance in minutes on a linear 0..1440 axis.
    pub fn distance(self, other: PunchMinute) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl std::fmt::Display for PunchMinute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<u16> for PunchMinute {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("minute of day out of range: {}", value))
    }
}

impl From<PunchMinute> for u16 {
    fn from(value: PunchMinute) -> Self {
        value.0
    }
}
