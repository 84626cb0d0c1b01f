use crate::ui::messages::success;
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if a table has a given column.
fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `students` table (identity registry).
fn create_students_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id     TEXT NOT NULL UNIQUE,
            full_name      TEXT NOT NULL DEFAULT '',
            rfid_tag       TEXT UNIQUE,
            guardian_email TEXT NOT NULL DEFAULT '',
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS identity_profiles (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id  TEXT NOT NULL UNIQUE,
            fingerprint TEXT NOT NULL UNIQUE
        );
        "#,
    )?;
    Ok(())
}

/// Create the `gate_events` table. Append-only access log.
fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS gate_events (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id TEXT NOT NULL,
            date       TEXT NOT NULL,
            time       TEXT NOT NULL,
            action     TEXT NOT NULL CHECK(action IN ('entry','exit')),
            success    INTEGER NOT NULL DEFAULT 1,
            reason     TEXT DEFAULT '',
            source     TEXT NOT NULL DEFAULT 'gate',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_gate_events_date_student ON gate_events(date, student_id);
        CREATE INDEX IF NOT EXISTS idx_gate_events_date_action ON gate_events(date, action);
        "#,
    )?;
    Ok(())
}

/// Create the `attendance` table. The UNIQUE(student_id, date) constraint
/// is the concurrency guard: concurrent first-events for the same key
/// cannot create two rows.
fn create_attendance_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id         TEXT NOT NULL,
            date               TEXT NOT NULL,
            present            INTEGER NOT NULL DEFAULT 0,
            first_entry_time   TEXT,
            last_exit_time     TEXT,
            verified           INTEGER NOT NULL DEFAULT 0,
            verification_notes TEXT DEFAULT '',
            override_reason    TEXT DEFAULT '',
            approved           INTEGER NOT NULL DEFAULT 0,
            approval_timestamp TEXT,
            approved_by        TEXT DEFAULT '',
            UNIQUE(student_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        "#,
    )?;
    Ok(())
}

/// Migrate an attendance table created before the approval workflow
/// existed: add approved / approval_timestamp / approved_by.
fn migrate_add_approval_columns(conn: &Connection) -> Result<(), Error> {
    let version = "20250304_0007_add_approval_fields";

    // 1) Skip if already applied
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(());
    }

    if table_has_column(conn, "attendance", "approved")? {
        // schema is current; just mark the migration so the check is O(1)
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, 'Approval fields already present')",
            [version],
        )?;
        return Ok(());
    }

    // 2) Apply the migration
    conn.execute_batch(
        r#"
        ALTER TABLE attendance ADD COLUMN approved INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE attendance ADD COLUMN approval_timestamp TEXT;
        ALTER TABLE attendance ADD COLUMN approved_by TEXT DEFAULT '';
        "#,
    )?;

    // 3) Mark as applied
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added approval fields to attendance')",
        [version],
    )?;

    success(format!(
        "Migration applied: {} → added approval fields to attendance table",
        version
    ));

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Create the stores if missing
    if !table_exists(conn, "students")? {
        create_students_table(conn)?;
        success("Created students + identity_profiles tables.");
    }

    if !table_exists(conn, "gate_events")? {
        create_events_table(conn)?;
        success("Created gate_events table.");
    } else {
        conn.execute_batch(
            r#"
            CREATE INDEX IF NOT EXISTS idx_gate_events_date_student ON gate_events(date, student_id);
            CREATE INDEX IF NOT EXISTS idx_gate_events_date_action ON gate_events(date, action);
            "#,
        )?;
    }

    if !table_exists(conn, "attendance")? {
        create_attendance_table(conn)?;
        success("Created attendance table.");
    } else {
        migrate_add_approval_columns(conn)?;
    }

    Ok(())
}
