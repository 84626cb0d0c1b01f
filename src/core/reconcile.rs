//! Reconciliation engine: compares the append-only event log against the
//! derived attendance store and surfaces inconsistencies. Read-only; safe
//! to run while the gate keeps writing.

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::{attendance, queries, students};
use crate::errors::AppResult;
use crate::models::anomaly::{Alert, Anomaly, AnomalyCode};
use crate::models::attendance::AttendanceRecord;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Header counts for a day's attendance log.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total: i64,
    pub present: i64,
    pub absent: i64,
}

/// Snapshot for the stats command (mirrors the monitoring dashboard).
#[derive(Debug, Clone, Serialize)]
pub struct LiveStats {
    pub students: i64,
    pub events_today: i64,
    pub success_rate: f64,
    pub present_today: i64,
    pub anomaly_count: usize,
    pub pending_reviews: usize,
}

/// Scan one day and evaluate every rule for every student with an
/// attendance record.
///
/// Rules are independent and non-exclusive: one student can trigger
/// several in the same pass. Output order is deterministic: rule order
/// first (the `AnomalyCode` declaration order), then ascending student id
/// within a rule.
///
/// `asof` is the wall-clock instant used by the after-hours rule; callers
/// pass the current local time outside of tests.
pub fn detect_anomalies(
    pool: &mut DbPool,
    date: NaiveDate,
    asof: NaiveTime,
    cfg: &Config,
) -> AppResult<Vec<Anomaly>> {
    let records = attendance::load_by_date(pool, &date)?;

    let mut activity = Vec::with_capacity(records.len());
    for record in &records {
        let counts = queries::day_activity(&pool.conn, &record.student_id, &date)?;
        activity.push(counts);
    }

    let cutoff = cfg.after_hours_cutoff();
    let threshold = cfg.repeated_failure_threshold;
    let mut anomalies = Vec::new();

    // entry_marked_absent: an entry reached the event log but the
    // attendance row still says absent, so the write path diverged.
    for (record, counts) in records.iter().zip(&activity) {
        if counts.entries > 0 && !record.present {
            anomalies.push(Anomaly {
                level: AnomalyCode::EntryMarkedAbsent.level(),
                code: AnomalyCode::EntryMarkedAbsent,
                student_id: record.student_id.clone(),
                detail: "Entry recorded but marked absent".to_string(),
            });
        }
    }

    // repeated_failures: spoofing attempts or broken gate hardware.
    for (record, counts) in records.iter().zip(&activity) {
        if counts.failures >= threshold {
            anomalies.push(Anomaly {
                level: AnomalyCode::RepeatedFailures.level(),
                code: AnomalyCode::RepeatedFailures,
                student_id: record.student_id.clone(),
                detail: format!("Multiple failed access attempts ({})", counts.failures),
            });
        }
    }

    // no_exit_after_hours: still on-site past the cutoff.
    if asof >= cutoff {
        for record in &records {
            if record.first_entry_time.is_some() && record.last_exit_time.is_none() {
                anomalies.push(Anomaly {
                    level: AnomalyCode::NoExitAfterHours.level(),
                    code: AnomalyCode::NoExitAfterHours,
                    student_id: record.student_id.clone(),
                    detail: "Present without exit after hours".to_string(),
                });
            }
        }
    }

    // duplicate_entries: re-entry without an intervening exit.
    for (record, counts) in records.iter().zip(&activity) {
        if counts.entries > counts.exits + 1 {
            anomalies.push(Anomaly {
                level: AnomalyCode::DuplicateEntries.level(),
                code: AnomalyCode::DuplicateEntries,
                student_id: record.student_id.clone(),
                detail: format!(
                    "Re-entry without exit ({} entries vs {} exits)",
                    counts.entries, counts.exits
                ),
            });
        }
    }

    Ok(anomalies)
}

/// Flatten anomalies into the alert feed. No new logic.
pub fn generate_alerts(anomalies: &[Anomaly]) -> Vec<Alert> {
    anomalies
        .iter()
        .map(|a| Alert {
            level: a.level,
            message: a.detail.clone(),
            student_id: a.student_id.clone(),
        })
        .collect()
}

/// Records waiting for operator confirmation. A plain filter: pending
/// means unconfirmed, not incorrect.
pub fn pending_reviews(pool: &mut DbPool, date: NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
    attendance::load_pending(pool, &date)
}

pub fn daily_summary(pool: &mut DbPool, date: NaiveDate) -> AppResult<DailySummary> {
    let (total, present) = attendance::day_counts(&pool.conn, &date)?;
    Ok(DailySummary {
        date,
        total,
        present,
        absent: total - present,
    })
}

pub fn live_stats(
    pool: &mut DbPool,
    date: NaiveDate,
    asof: NaiveTime,
    cfg: &Config,
) -> AppResult<LiveStats> {
    let students = students::count_students(&pool.conn)?;
    let (events_today, successes) = queries::count_events_for_date(&pool.conn, &date)?;
    let (_, present_today) = attendance::day_counts(&pool.conn, &date)?;

    let success_rate = if events_today > 0 {
        (successes as f64 / events_today as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    let anomaly_count = detect_anomalies(pool, date, asof, cfg)?.len();
    let pending = pending_reviews(pool, date)?.len();

    Ok(LiveStats {
        students,
        events_today,
        success_rate,
        present_today,
        anomaly_count,
        pending_reviews: pending,
    })
}
