//! Input rows handed to the engine by the row-extraction collaborator.

use serde::{Deserialize, Serialize};

/// One extracted spreadsheet row for an employee-day.
///
/// Field values are kept exactly as they were read. `time` carries one or
/// more whitespace-separated time tokens, e.g. `"08:01 15:32 15:32"`.
///
/// # Example
///
/// ```
/// use attendance_engine::models::AttendanceRow;
///
/// let row = AttendanceRow {
///     employee_id: "10023456".to_string(),
///     employee_name: "Somchai K.".to_string(),
///     department: "Warehouse".to_string(),
///     date: "05/01/2567".to_string(),
///     time: "08:01 15:32 15:32".to_string(),
///     shift: Some("B".to_string()),
/// };
/// assert_eq!(row.time.split_whitespace().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// Employee identifier, 6 to 10 ASCII digits.
    pub employee_id: String,
    /// Employee display name.
    pub employee_name: String,
    /// Department name.
    #[serde(default)]
    pub department: String,
    /// Raw date token.
    pub date: String,
    /// Raw whitespace-separated time tokens.
    #[serde(default)]
    pub time: String,
    /// Optional shift label hint.
    #[serde(default)]
    pub shift: Option<String>,
}
