//! Localized work-duration strings.

use serde::{Deserialize, Serialize};

/// Language used for duration strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationLocale {
    /// `9 ชม. 0 นาที`
    #[default]
    Thai,
    /// `9 h 0 min`
    English,
}

/// Formats a minute count as hours and minutes.
///
/// ```
/// use attendance_engine::codec::{format_duration, DurationLocale};
///
/// assert_eq!(format_duration(540, DurationLocale::Thai), "9 ชม. 0 นาที");
/// assert_eq!(format_duration(202, DurationLocale::English), "3 h 22 min");
/// ```
pub fn format_duration(minutes: u32, locale: DurationLocale) -> String {
    let (hours, minutes) = (minutes / 60, minutes % 60);
    match locale {
        DurationLocale::Thai => format!("{} ชม. {} นาที", hours, minutes),
        DurationLocale::English => format!("{} h {} min", hours, minutes),
    }
}
