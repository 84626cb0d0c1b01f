// src/export/model.rs

use serde::Serialize;

/// Flat row for gate-event export.
#[derive(Serialize, Clone, Debug)]
pub struct EventExport {
    pub id: i64,
    pub student_id: String,
    pub date: String,
    pub time: String,
    pub action: String,
    pub success: i64,
    pub reason: String,
    pub source: String,
}

/// Flat row for attendance export.
#[derive(Serialize, Clone, Debug)]
pub struct AttendanceExport {
    pub student_id: String,
    pub date: String,
    pub present: i64,
    pub first_entry_time: String,
    pub last_exit_time: String,
    pub verified: i64,
    pub approved: i64,
    pub approved_by: String,
    pub override_reason: String,
}
