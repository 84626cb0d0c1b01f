use crate::errors::{AppError, AppResult};
use crate::models::student::Student;
use rusqlite::params;
use rusqlite::{Connection, OptionalExtension, Result, Row};

pub fn map_student_row(row: &Row) -> Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        full_name: row.get("full_name")?,
        rfid_tag: row.get("rfid_tag")?,
        guardian_email: row.get("guardian_email")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_student(conn: &Connection, student: &Student) -> AppResult<i64> {
    let result = conn.execute(
        "INSERT INTO students (student_id, full_name, rfid_tag, guardian_email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            student.student_id,
            student.full_name,
            student.rfid_tag,
            student.guardian_email,
            student.created_at,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            // unique student_id or rfid_tag already taken
            Err(AppError::DuplicateStudent(student.student_id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_student_id(conn: &Connection, student_id: &str) -> AppResult<Option<Student>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM students WHERE student_id = ?1")?;
    let student = stmt.query_row([student_id], map_student_row).optional()?;
    Ok(student)
}

pub fn find_by_rfid(conn: &Connection, rfid_tag: &str) -> AppResult<Option<Student>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM students WHERE rfid_tag = ?1")?;
    let student = stmt.query_row([rfid_tag], map_student_row).optional()?;
    Ok(student)
}

/// Lookup that treats a missing student as an error. Used by operator
/// commands where an unknown id means a typo, not a fallback path.
pub fn require_student(conn: &Connection, student_id: &str) -> AppResult<Student> {
    find_by_student_id(conn, student_id)?
        .ok_or_else(|| AppError::StudentNotFound(student_id.to_string()))
}

pub fn count_students(conn: &Connection) -> AppResult<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    Ok(count)
}
