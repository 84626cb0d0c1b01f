use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::gate_event::GateEvent;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::params;
use rusqlite::{Connection, OptionalExtension, Result, Row};

pub fn map_attendance_row(row: &Row) -> Result<AttendanceRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        date,
        present: row.get::<_, i64>("present")? == 1,
        first_entry_time: parse_opt_time(row.get::<_, Option<String>>("first_entry_time")?)?,
        last_exit_time: parse_opt_time(row.get::<_, Option<String>>("last_exit_time")?)?,
        verified: row.get::<_, i64>("verified")? == 1,
        verification_notes: row.get::<_, Option<String>>("verification_notes")?.unwrap_or_default(),
        override_reason: row.get::<_, Option<String>>("override_reason")?.unwrap_or_default(),
        approved: row.get::<_, i64>("approved")? == 1,
        approval_timestamp: row.get("approval_timestamp")?,
        approved_by: row.get::<_, Option<String>>("approved_by")?.unwrap_or_default(),
    })
}

fn parse_opt_time(value: Option<String>) -> Result<Option<NaiveTime>> {
    match value {
        None => Ok(None),
        Some(s) => NaiveTime::parse_from_str(&s, "%H:%M:%S")
            .map(Some)
            .map_err(|_| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(AppError::InvalidTime(s)),
                )
            }),
    }
}

/// Fold one gate event into the day's attendance row.
///
/// A single upsert per event: the UNIQUE(student_id, date) constraint turns
/// a concurrent "create" into an update for the race loser, so two
/// simultaneous first-events cannot produce two rows.
/// - successful ENTRY: present = 1, first_entry_time kept if already set
/// - successful EXIT: last_exit_time always overwritten
/// - failed event: row is created with defaults so reconciliation sees it
pub fn apply_event(conn: &Connection, ev: &GateEvent) -> AppResult<()> {
    let date_str = ev.date_str();
    let time_str = ev.time_str();

    if ev.success && ev.action.is_entry() {
        conn.execute(
            "INSERT INTO attendance (student_id, date, present, first_entry_time)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(student_id, date) DO UPDATE SET
                 present = 1,
                 first_entry_time = COALESCE(attendance.first_entry_time, excluded.first_entry_time)",
            params![ev.student_id, date_str, time_str],
        )?;
    } else if ev.success && ev.action.is_exit() {
        conn.execute(
            "INSERT INTO attendance (student_id, date, last_exit_time)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(student_id, date) DO UPDATE SET
                 last_exit_time = excluded.last_exit_time",
            params![ev.student_id, date_str, time_str],
        )?;
    } else {
        conn.execute(
            "INSERT INTO attendance (student_id, date)
             VALUES (?1, ?2)
             ON CONFLICT(student_id, date) DO NOTHING",
            params![ev.student_id, date_str],
        )?;
    }

    Ok(())
}

/// Operator-driven presence change (override path).
/// `entry_time` is only written when the record has no first_entry_time yet.
pub fn set_presence(
    conn: &Connection,
    student_id: &str,
    date: &NaiveDate,
    present: bool,
    entry_time: Option<NaiveTime>,
) -> AppResult<()> {
    let date_str = date.format("%Y-%m-%d").to_string();

    if present {
        conn.execute(
            "INSERT INTO attendance (student_id, date, present, first_entry_time)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(student_id, date) DO UPDATE SET
                 present = 1,
                 first_entry_time = COALESCE(attendance.first_entry_time, excluded.first_entry_time)",
            params![
                student_id,
                date_str,
                entry_time.map(|t| t.format("%H:%M:%S").to_string()),
            ],
        )?;
    } else {
        conn.execute(
            "INSERT INTO attendance (student_id, date, present)
             VALUES (?1, ?2, 0)
             ON CONFLICT(student_id, date) DO UPDATE SET present = 0",
            params![student_id, date_str],
        )?;
    }

    Ok(())
}

/// Stamp the override outcome. An override always counts as verification.
pub fn set_override(
    conn: &Connection,
    student_id: &str,
    date: &NaiveDate,
    reason: &str,
) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance
         SET override_reason = ?1, verified = 1
         WHERE student_id = ?2 AND date = ?3",
        params![reason, student_id, date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(())
}

pub fn set_verification(
    conn: &Connection,
    record_id: i64,
    verified: bool,
    notes: &str,
    entry_time: Option<NaiveTime>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance
         SET verified = ?1,
             verification_notes = ?2,
             first_entry_time = COALESCE(first_entry_time, ?3)
         WHERE id = ?4",
        params![
            if verified { 1 } else { 0 },
            notes,
            entry_time.map(|t| t.format("%H:%M:%S").to_string()),
            record_id,
        ],
    )?;
    Ok(())
}

/// Batch approval for a whole day. Returns the number of rows touched.
pub fn approve_all(
    conn: &Connection,
    date: &NaiveDate,
    approver: &str,
    timestamp: &str,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE attendance
         SET approved = 1, approval_timestamp = ?1, approved_by = ?2, verified = 1
         WHERE date = ?3",
        params![timestamp, approver, date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(n)
}

pub fn find(
    conn: &Connection,
    student_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM attendance WHERE student_id = ?1 AND date = ?2",
    )?;

    let record = stmt
        .query_row(
            params![student_id, date.format("%Y-%m-%d").to_string()],
            map_attendance_row,
        )
        .optional()?;

    Ok(record)
}

/// All records of a day, ordered by student id for deterministic reports.
pub fn load_by_date(pool: &mut DbPool, date: &NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = pool.conn.prepare(
        "SELECT * FROM attendance
         WHERE date = ?1
         ORDER BY student_id ASC",
    )?;

    let rows = stmt.query_map([date.format("%Y-%m-%d").to_string()], map_attendance_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Records still waiting for operator confirmation.
pub fn load_pending(pool: &mut DbPool, date: &NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = pool.conn.prepare(
        "SELECT * FROM attendance
         WHERE date = ?1 AND verified = 0
         ORDER BY student_id ASC",
    )?;

    let rows = stmt.query_map([date.format("%Y-%m-%d").to_string()], map_attendance_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// (total, present) counts for a day.
pub fn day_counts(conn: &Connection, date: &NaiveDate) -> AppResult<(i64, i64)> {
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*), COALESCE(SUM(present), 0)
         FROM attendance
         WHERE date = ?1",
    )?;

    let counts = stmt.query_row([date.format("%Y-%m-%d").to_string()], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })?;

    Ok(counts)
}
