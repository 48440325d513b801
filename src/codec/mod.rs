//! Boundary codecs: raw time and date tokens in, canonical values out.
//!
//! Every stage after this module works on [`PunchMinute`](crate::models::PunchMinute)
//! and [`NaiveDate`](chrono::NaiveDate) only.

mod date;
mod duration;
mod time;

pub use date::{BUDDHIST_ERA_OFFSET, ParsedDate, parse_date};
pub use duration::{DurationLocale, format_duration};
pub use time::{ParsedPunches, TimeToken, format_time, parse_punches, parse_time};
