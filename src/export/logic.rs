// src/export/logic.rs

use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::model::{AttendanceExport, EventExport};
use crate::export::range::parse_range;
use crate::ui::messages::warning;

use crate::export::json_csv::{export_csv, export_json};
use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::params;
use std::io;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export gate events or attendance records.
    ///
    /// - `format`: "csv" | "json"
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or expressions like:
    ///   - `YYYY`
    ///   - `YYYY-MM`
    ///   - `YYYY-MM-DD`
    ///   - `YYYY:YYYY`
    ///   - `YYYY-MM:YYYY-MM`
    ///   - `YYYY-MM-DD:YYYY-MM-DD`
    /// - `events`: true → raw gate events, false → attendance records
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        events: bool,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(crate::errors::AppError::from(io::Error::other(format!(
                "Output file path must be absolute: {file}"
            ))));
        }

        ensure_writable(path, force)?;

        let date_bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        if events {
            let rows = load_events(pool, date_bounds)?;

            if rows.is_empty() {
                warning("No gate events found for selected range.");
                return Ok(());
            }

            match format {
                ExportFormat::Csv => export_csv(&rows, path)?,
                ExportFormat::Json => export_json(&rows, path)?,
            }
        } else {
            let rows = load_attendance(pool, date_bounds)?;

            if rows.is_empty() {
                warning("No attendance records found for selected range.");
                return Ok(());
            }

            match format {
                ExportFormat::Csv => export_csv(&rows, path)?,
                ExportFormat::Json => export_json(&rows, path)?,
            }
        }

        Ok(())
    }
}

fn load_events(
    pool: &mut DbPool,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<EventExport>> {
    let conn = &mut pool.conn;

    let mut rows_out = Vec::new();

    match bounds {
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, student_id, date, time, action, success, reason, source
                 FROM gate_events
                 ORDER BY date ASC, time ASC, id ASC",
            )?;

            let rows = stmt.query_map([], map_event_row)?;

            for r in rows {
                rows_out.push(r?);
            }
        }
        Some((start, end)) => {
            let start_str = start.format("%Y-%m-%d").to_string();
            let end_str = end.format("%Y-%m-%d").to_string();

            let mut stmt = conn.prepare(
                "SELECT id, student_id, date, time, action, success, reason, source
                 FROM gate_events
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date ASC, time ASC, id ASC",
            )?;

            let rows = stmt.query_map(params![start_str, end_str], map_event_row)?;

            for r in rows {
                rows_out.push(r?);
            }
        }
    }

    Ok(rows_out)
}

fn load_attendance(
    pool: &mut DbPool,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<AttendanceExport>> {
    let conn = &mut pool.conn;

    let mut rows_out = Vec::new();

    match bounds {
        None => {
            let mut stmt = conn.prepare(
                "SELECT student_id, date, present, first_entry_time, last_exit_time,
                        verified, approved, approved_by, override_reason
                 FROM attendance
                 ORDER BY date ASC, student_id ASC",
            )?;

            let rows = stmt.query_map([], map_attendance_row)?;

            for r in rows {
                rows_out.push(r?);
            }
        }
        Some((start, end)) => {
            let start_str = start.format("%Y-%m-%d").to_string();
            let end_str = end.format("%Y-%m-%d").to_string();

            let mut stmt = conn.prepare(
                "SELECT student_id, date, present, first_entry_time, last_exit_time,
                        verified, approved, approved_by, override_reason
                 FROM attendance
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date ASC, student_id ASC",
            )?;

            let rows = stmt.query_map(params![start_str, end_str], map_attendance_row)?;

            for r in rows {
                rows_out.push(r?);
            }
        }
    }

    Ok(rows_out)
}

/// Mapping DB → EventExport (shared across queries).
fn map_event_row(row: &Row<'_>) -> rusqlite::Result<EventExport> {
    Ok(EventExport {
        id: row.get(0)?,
        student_id: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        action: row.get(4)?,
        success: row.get(5)?,
        reason: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        source: row.get(7)?,
    })
}

fn map_attendance_row(row: &Row<'_>) -> rusqlite::Result<AttendanceExport> {
    Ok(AttendanceExport {
        student_id: row.get(0)?,
        date: row.get(1)?,
        present: row.get(2)?,
        first_entry_time: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        last_exit_time: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        verified: row.get(5)?,
        approved: row.get(6)?,
        approved_by: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        override_reason: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
    })
}
