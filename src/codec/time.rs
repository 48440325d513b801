//! Time token parsing and formatting.
//!
//! Clock readers and spreadsheets hand over punch times either as `HH:MM`
//! text or as a spreadsheet time serial (the fraction of a day). Both are
//! resolved here, once, into a [`PunchMinute`].

use crate::models::{MINUTES_PER_DAY, PunchMinute};

/// A classified time token.
///
/// # Example
///
/// ```
/// use attendance_engine::codec::{parse_time, TimeToken};
///
/// assert_eq!(parse_time("08:30"), TimeToken::Colon { hour: 8, minute: 30 });
/// assert_eq!(parse_time("0.5"), TimeToken::FractionalDay(0.5));
/// assert_eq!(parse_time("8h30"), TimeToken::Invalid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeToken {
    /// `HH:MM`, 24-hour clock.
    Colon {
        /// Hour, 0-23.
        hour: u16,
        /// Minute, 0-59.
        minute: u16,
    },
    /// A fraction of a day in `[0, 1)`.
    FractionalDay(f64),
    /// Anything else.
    Invalid,
}

impl TimeToken {
    /// Resolves the token to minutes since midnight.
    ///
    /// A fractional day that rounds up to a full day wraps to midnight.
    pub fn minute(self) -> Option<PunchMinute> {
        match self {
            TimeToken::Colon { hour, minute } => PunchMinute::from_hm(hour, minute),
            TimeToken::FractionalDay(fraction) => {
                let minutes = (fraction * f64::from(MINUTES_PER_DAY)).round() as u16;
                PunchMinute::new(minutes % MINUTES_PER_DAY)
            }
            TimeToken::Invalid => None,
        }
    }
}

/// Classifies a single raw time token.
pub fn parse_time(raw: &str) -> TimeToken {
    let raw = raw.trim();

    if let Some((hour, minute)) = raw.split_once(':') {
        return parse_colon(hour, minute).unwrap_or(TimeToken::Invalid);
    }

    parse_fraction(raw).unwrap_or(TimeToken::Invalid)
}

fn parse_colon(hour: &str, minute: &str) -> Option<TimeToken> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
        return None;
    }

    let hour: u16 = hour.parse().ok()?;
    let minute: u16 = minute.parse().ok()?;
    (hour < 24 && minute < 60).then_some(TimeToken::Colon { hour, minute })
}

fn parse_fraction(raw: &str) -> Option<TimeToken> {
    // Plain decimal notation only; f64 parsing would also accept "inf" and exponents.
    let dots = raw.bytes().filter(|b| *b == b'.').count();
    if raw.is_empty() || dots > 1 || !raw.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }

    let fraction: f64 = raw.parse().ok()?;
    (0.0..1.0)
        .contains(&fraction)
        .then_some(TimeToken::FractionalDay(fraction))
}

/// Formats a punch minute as zero-padded `HH:MM`.
///
/// ```
/// use attendance_engine::codec::format_time;
/// use attendance_engine::models::PunchMinute;
///
/// assert_eq!(format_time(PunchMinute::new(481).unwrap()), "08:01");
/// ```
pub fn format_time(minute: PunchMinute) -> String {
    minute.to_string()
}

/// The punches of one time string, with the tokens that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPunches {
    /// Valid punches, in input order.
    pub minutes: Vec<PunchMinute>,
    /// Tokens that were not valid times.
    pub invalid_tokens: Vec<String>,
}

/// Splits a whitespace-separated time string into punches.
///
/// Invalid tokens are collected rather than failing the row.
///
/// ```
/// use attendance_engine::codec::parse_punches;
///
/// let parsed = parse_punches("08:01 15:32 ?? 15:32");
/// assert_eq!(parsed.minutes.len(), 3);
/// assert_eq!(parsed.invalid_tokens, vec!["??".to_string()]);
/// ```
pub fn parse_punches(raw: &str) -> ParsedPunches {
    let mut parsed = ParsedPunches::default();
    for token in raw.split_whitespace() {
        match parse_time(token).minute() {
            Some(minute) => parsed.minutes.push(minute),
            None => parsed.invalid_tokens.push(token.to_string()),
        }
    }
    parsed
}
