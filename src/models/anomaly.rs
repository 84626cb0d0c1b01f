use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AnomalyLevel {
    Critical,
    Warning,
}

impl AnomalyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLevel::Critical => "critical",
            AnomalyLevel::Warning => "warning",
        }
    }
}

/// The fixed rule set of the reconciliation engine. The enum order is
/// the report order: anomalies are emitted rule by rule, each rule
/// sorted by student id, so output is deterministic.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AnomalyCode {
    EntryMarkedAbsent,
    RepeatedFailures,
    NoExitAfterHours,
    DuplicateEntries,
}

impl AnomalyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyCode::EntryMarkedAbsent => "entry_marked_absent",
            AnomalyCode::RepeatedFailures => "repeated_failures",
            AnomalyCode::NoExitAfterHours => "no_exit_after_hours",
            AnomalyCode::DuplicateEntries => "duplicate_entries",
        }
    }

    pub fn level(&self) -> AnomalyLevel {
        match self {
            AnomalyCode::EntryMarkedAbsent => AnomalyLevel::Critical,
            AnomalyCode::RepeatedFailures
            | AnomalyCode::NoExitAfterHours
            | AnomalyCode::DuplicateEntries => AnomalyLevel::Warning,
        }
    }
}

/// A detected inconsistency between the event log and the attendance
/// store, or a suspicious access pattern. Derived per query, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Anomaly {
    pub level: AnomalyLevel,
    pub code: AnomalyCode,
    pub student_id: String,
    pub detail: String,
}

/// Flat projection of an anomaly for the alert feed.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub level: AnomalyLevel,
    pub message: String,
    pub student_id: String,
}
