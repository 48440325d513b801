//! Punch deduplication.
//!
//! Card readers often register two scans a few seconds apart for one swipe.
//! Scans that follow their predecessor within a small threshold are treated
//! as the same physical punch.

use crate::models::PunchMinute;

/// Sorts punches and collapses each run of near-duplicates to its first value.
///
/// A punch belongs to the current run when it lies within
/// `threshold_minutes` of the punch directly before it in sorted order, so a
/// run can be longer than the threshold when scans keep arriving.
///
/// The result is strictly increasing and the operation is idempotent.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::dedupe_punches;
/// use attendance_engine::models::PunchMinute;
///
/// let hm = |h, m| PunchMinute::from_hm(h, m).unwrap();
/// let cleaned = dedupe_punches(&[hm(19, 22), hm(8, 1), hm(19, 21), hm(8, 0)], 2);
/// assert_eq!(cleaned, vec![hm(8, 0), hm(19, 21)]);
/// ```
pub fn dedupe_punches(punches: &[PunchMinute], threshold_minutes: u16) -> Vec<PunchMinute> {
    let mut sorted = punches.to_vec();
    sorted.sort_unstable();

    let mut cleaned: Vec<PunchMinute> = Vec::with_capacity(sorted.len());
    let mut previous: Option<PunchMinute> = None;

    for punch in sorted {
        let same_run = previous.is_some_and(|p| punch.distance(p) <= threshold_minutes);
        if !same_run {
            cleaned.push(punch);
        }
        previous = Some(punch);
    }

    cleaned
}
