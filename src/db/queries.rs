use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::gate_action::GateAction;
use crate::models::gate_event::GateEvent;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::params;
use rusqlite::{Connection, Result, Row};

/// Per-student counters for one day, derived from the event log.
#[derive(Debug, Default, Clone, Copy)]
pub struct DayActivity {
    pub entries: i64,  // successful ENTRY events
    pub exits: i64,    // successful EXIT events
    pub failures: i64, // events with success = 0, any action
}

pub fn map_event_row(row: &Row) -> Result<GateEvent> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let time = NaiveTime::parse_from_str(&time_str, "%H:%M:%S").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(time_str.clone())),
        )
    })?;

    let action_str: String = row.get("action")?;
    let action = GateAction::from_db_str(&action_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidAction(action_str.clone())),
        )
    })?;

    Ok(GateEvent {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        date,
        time,
        action,
        success: row.get::<_, i64>("success")? == 1,
        reason: row.get("reason")?,
        source: row.get("source")?,
        created_at: row.get("created_at")?,
    })
}

/// Append one event to the log. The returned id is the inserted rowid.
pub fn insert_event(conn: &Connection, ev: &GateEvent) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO gate_events (student_id, date, time, action, success, reason, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            ev.student_id,
            ev.date.format("%Y-%m-%d").to_string(),
            ev.time.format("%H:%M:%S").to_string(),
            ev.action.to_db_str(),
            if ev.success { 1 } else { 0 },
            ev.reason,
            ev.source,
            ev.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All events of a day, in gate order.
pub fn load_events_by_date(pool: &mut DbPool, date: &NaiveDate) -> AppResult<Vec<GateEvent>> {
    let mut stmt = pool.conn.prepare(
        "SELECT * FROM gate_events
         WHERE date = ?1
         ORDER BY time ASC, id ASC",
    )?;

    let date_str = date.format("%Y-%m-%d").to_string();

    let rows = stmt.query_map([date_str], map_event_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// One-pass day counters for a single student.
pub fn day_activity(conn: &Connection, student_id: &str, date: &NaiveDate) -> AppResult<DayActivity> {
    let mut stmt = conn.prepare_cached(
        "SELECT
            COALESCE(SUM(CASE WHEN action = 'entry' AND success = 1 THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN action = 'exit'  AND success = 1 THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN success = 0 THEN 1 ELSE 0 END), 0)
         FROM gate_events
         WHERE date = ?1 AND student_id = ?2",
    )?;

    let activity = stmt.query_row(
        params![date.format("%Y-%m-%d").to_string(), student_id],
        |row| {
            Ok(DayActivity {
                entries: row.get(0)?,
                exits: row.get(1)?,
                failures: row.get(2)?,
            })
        },
    )?;

    Ok(activity)
}

/// Day-wide event totals: (total, successful).
pub fn count_events_for_date(conn: &Connection, date: &NaiveDate) -> AppResult<(i64, i64)> {
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*), COALESCE(SUM(success), 0)
         FROM gate_events
         WHERE date = ?1",
    )?;

    let counts = stmt.query_row([date.format("%Y-%m-%d").to_string()], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })?;

    Ok(counts)
}
