//! Date token parsing.
//!
//! Accepted encodings:
//! - `D/M/Y` or `D-M-Y` (day first), e.g. `05/01/2567`;
//! - `Y-M-D` or `Y/M/D` when the first component has four digits;
//! - a spreadsheet serial day count from 1899-12-30, e.g. `45296`.
//!
//! Two-digit years are in the 2000s. Years after 2500 are Buddhist era and
//! are shifted back by 543.

use chrono::{Days, NaiveDate};

/// Offset between the Buddhist and Christian eras.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Years above this are read as Buddhist era.
const BUDDHIST_ERA_CUTOFF: i32 = 2500;

/// The outcome of parsing a date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// A valid calendar date.
    Calendar(NaiveDate),
    /// The token is not a recognisable date.
    Invalid,
}

impl ParsedDate {
    /// Returns the date, if one was parsed.
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            ParsedDate::Calendar(date) => Some(date),
            ParsedDate::Invalid => None,
        }
    }
}

/// Parses a raw date token.
///
/// A trailing time of day (`2024-01-05 00:00:00`, `2024-01-05T08:00`) is
/// ignored.
///
/// # Example
///
/// ```
/// use attendance_engine::codec::{parse_date, ParsedDate};
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// assert_eq!(parse_date("05/01/2567"), ParsedDate::Calendar(expected));
/// assert_eq!(parse_date("2024-01-05"), ParsedDate::Calendar(expected));
/// assert_eq!(parse_date("45296"), ParsedDate::Calendar(expected));
/// assert_eq!(parse_date("yesterday"), ParsedDate::Invalid);
/// ```
pub fn parse_date(raw: &str) -> ParsedDate {
    let token = raw
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or_default();

    let parsed = if token.contains(['/', '-']) {
        parse_delimited(token)
    } else {
        parse_serial(token)
    };

    parsed.map_or(ParsedDate::Invalid, ParsedDate::Calendar)
}

fn parse_delimited(token: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split(['/', '-']).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let (year, month, day) = if first.len() == 4 {
        (*first, *second, *third)
    } else {
        (*third, *second, *first)
    };

    let year = normalize_year(year.parse().ok()?);
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn normalize_year(year: i32) -> i32 {
    if year < 100 {
        year + 2000
    } else if year > BUDDHIST_ERA_CUTOFF {
        year - BUDDHIST_ERA_OFFSET
    } else {
        year
    }
}

fn parse_serial(token: &str) -> Option<NaiveDate> {
    let dots = token.bytes().filter(|b| *b == b'.').count();
    if token.is_empty() || dots > 1 || !token.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }

    let serial: f64 = token.parse().ok()?;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.trunc() as u64))
}
