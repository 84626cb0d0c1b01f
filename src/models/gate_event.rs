use super::gate_action::GateAction;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

/// One access attempt at the gate. Append-only: rows are never updated
/// or deleted once written.
#[derive(Debug, Clone, Serialize)]
pub struct GateEvent {
    pub id: i64,
    pub student_id: String,  // ⇔ gate_events.student_id
    pub date: NaiveDate,     // ⇔ gate_events.date (TEXT "YYYY-MM-DD")
    pub time: NaiveTime,     // ⇔ gate_events.time (TEXT "HH:MM:SS")
    pub action: GateAction,  // ⇔ gate_events.action ('entry' | 'exit')
    pub success: bool,       // ⇔ gate_events.success (INT, default 1)
    pub reason: String,      // ⇔ gate_events.reason (TEXT, default '')
    pub source: String,      // ⇔ gate_events.source ('gate' | 'manual' | 'override')
    pub created_at: String,  // ⇔ gate_events.created_at (TEXT, ISO8601)
}

impl GateEvent {
    /// High-level constructor for events created by the gate controller.
    /// - `id = 0` until the row is inserted
    /// - `created_at = now() in ISO8601`
    pub fn new(
        student_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        action: GateAction,
        success: bool,
        reason: &str,
        source: &str,
    ) -> Self {
        Self {
            id: 0,
            student_id: student_id.to_string(),
            date,
            time,
            action,
            success,
            reason: reason.to_string(),
            source: source.to_string(),
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}
