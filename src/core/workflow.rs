//! Override / approval workflow: operator-driven state transitions on
//! attendance records, each leaving an audit-log row.

use crate::config::Config;
use crate::core::gate::GateController;
use crate::db::pool::DbPool;
use crate::db::{attendance, log, students};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::gate_action::GateAction;
use crate::models::student::Student;
use chrono::{Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideType {
    MarkPresent,
    MarkAbsent,
    GrantAccess,
}

impl OverrideType {
    /// Parse operator input. Anything unrecognized is rejected before any
    /// mutation happens.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mark_present" => Some(OverrideType::MarkPresent),
            "mark_absent" => Some(OverrideType::MarkAbsent),
            "grant_access" => Some(OverrideType::GrantAccess),
            _ => None,
        }
    }

    pub fn action_taken(&self) -> &'static str {
        match self {
            OverrideType::MarkPresent => "marked_present",
            OverrideType::MarkAbsent => "marked_absent",
            OverrideType::GrantAccess => "access_granted",
        }
    }
}

/// Fire-and-forget notification stub: reports who would be notified,
/// nothing is sent from the core.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationOutcome {
    pub guardian_notified: bool,
    pub teacher_notified: bool,
}

pub fn send_override_notifications(student: &Student) -> NotificationOutcome {
    NotificationOutcome {
        guardian_notified: !student.guardian_email.is_empty(),
        teacher_notified: true,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverrideOutcome {
    pub student_id: String,
    pub action_taken: &'static str,
    pub notifications: NotificationOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalSummary {
    pub date: NaiveDate,
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub approval_timestamp: String,
    pub approved_by: String,
}

/// Apply a manual correction to one (student, date).
///
/// `grant_access` is the only override that writes to the event log, and
/// it does so through the gate controller so the entry follows the exact
/// same semantics as a physical scan. Every successful override marks the
/// record verified.
pub fn apply_override(
    pool: &mut DbPool,
    student_id: &str,
    date: NaiveDate,
    type_code: &str,
    reason: &str,
) -> AppResult<OverrideOutcome> {
    let kind = OverrideType::from_code(type_code)
        .ok_or_else(|| AppError::InvalidOverride(type_code.to_string()))?;

    let student = students::require_student(&pool.conn, student_id)?;
    let now = Local::now().naive_local();

    match kind {
        OverrideType::MarkPresent => {
            attendance::set_presence(&pool.conn, student_id, &date, true, Some(now.time()))?;
        }
        OverrideType::MarkAbsent => {
            attendance::set_presence(&pool.conn, student_id, &date, false, None)?;
        }
        OverrideType::GrantAccess => {
            GateController::record_access(
                pool,
                &student,
                GateAction::Entry,
                true,
                &format!("Admin override: {}", reason),
                "override",
                date.and_time(now.time()),
            )?;
        }
    }

    attendance::set_override(&pool.conn, student_id, &date, reason)?;

    log::ttlog(
        &pool.conn,
        "override",
        student_id,
        &format!("{} on {} ({})", kind.action_taken(), date, reason),
    )?;

    Ok(OverrideOutcome {
        student_id: student.student_id.clone(),
        action_taken: kind.action_taken(),
        notifications: send_override_notifications(&student),
    })
}

/// Close the day: mark every record approved and verified, stamp the
/// approver. Anomaly detection is NOT re-run: approval does not clear
/// anomalies.
pub fn approve_daily_attendance(
    pool: &mut DbPool,
    date: NaiveDate,
    approver: &str,
) -> AppResult<ApprovalSummary> {
    if approver.trim().is_empty() {
        return Err(AppError::InvalidInput("approver must not be empty".into()));
    }

    let timestamp = Local::now().to_rfc3339();
    let touched = attendance::approve_all(&pool.conn, &date, approver, &timestamp)?;
    let (total, present) = attendance::day_counts(&pool.conn, &date)?;

    log::ttlog(
        &pool.conn,
        "approve",
        &date.to_string(),
        &format!("{} records approved by {}", touched, approver),
    )?;

    Ok(ApprovalSummary {
        date,
        total,
        present,
        absent: total - present,
        approval_timestamp: timestamp,
        approved_by: approver.to_string(),
    })
}

/// Operator confirmation of a single record.
///
/// When `verify_sets_entry_time` is enabled in the config, verifying a
/// record with no entry time stamps it with the current time (the legacy
/// behavior). Disabled by default: verification should not fabricate an
/// entry that never happened.
pub fn verify_attendance(
    pool: &mut DbPool,
    cfg: &Config,
    student_id: &str,
    date: NaiveDate,
    verified: bool,
    notes: &str,
) -> AppResult<AttendanceRecord> {
    students::require_student(&pool.conn, student_id)?;

    let record = attendance::find(&pool.conn, student_id, &date)?.ok_or_else(|| {
        AppError::RecordNotFound(student_id.to_string(), date.to_string())
    })?;

    let entry_time = if verified
        && record.first_entry_time.is_none()
        && cfg.verify_sets_entry_time
    {
        Some(Local::now().time())
    } else {
        None
    };

    attendance::set_verification(&pool.conn, record.id, verified, notes, entry_time)?;

    log::ttlog(
        &pool.conn,
        "verify",
        student_id,
        &format!(
            "{} on {}{}",
            if verified { "verified" } else { "unverified" },
            date,
            if notes.is_empty() {
                String::new()
            } else {
                format!(" ({})", notes)
            }
        ),
    )?;

    let updated = attendance::find(&pool.conn, student_id, &date)?.ok_or_else(|| {
        AppError::RecordNotFound(student_id.to_string(), date.to_string())
    })?;

    Ok(updated)
}
