use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Daily presence summary for one student. At most one row per
/// (student, date), enforced by a UNIQUE constraint in the schema.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: String,
    pub date: NaiveDate,
    pub present: bool,
    /// Set on the first successful entry of the day, never overwritten.
    pub first_entry_time: Option<NaiveTime>,
    /// Overwritten on every successful exit; the latest exit wins.
    pub last_exit_time: Option<NaiveTime>,
    pub verified: bool,
    pub verification_notes: String,
    pub override_reason: String,
    pub approved: bool,
    pub approval_timestamp: Option<String>,
    pub approved_by: String,
}

impl AttendanceRecord {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn presence_label(&self) -> &'static str {
        if self.present { "present" } else { "absent" }
    }
}
