//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid gate action: {0}")]
    InvalidAction(String),

    #[error("Invalid override type: {0}")]
    InvalidOverride(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("No attendance record for {0} on {1}")]
    RecordNotFound(String, String),

    #[error("Student already enrolled: {0}")]
    DuplicateStudent(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
