//! Identity verification boundary.
//!
//! The gate accepts two credentials: an RFID tag (exact match against the
//! student registry) and a biometric sample. Real biometric matching lives
//! behind the `IdentityVerifier` trait so the backend can be swapped; the
//! shipped implementation stores normalized sample templates and matches
//! them exactly.

use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, params};

pub trait IdentityVerifier {
    /// Register a sample for a student, replacing any previous one.
    fn enroll(&self, student_id: &str, sample: &str) -> AppResult<()>;

    /// Match a sample against enrolled profiles.
    /// "No match" is a normal outcome, not an error; the caller falls
    /// back to manual check-in.
    fn identify(&self, sample: &str) -> AppResult<Option<String>>;
}

/// Template store backed by the `identity_profiles` table.
pub struct ProfileStore<'c> {
    conn: &'c Connection,
}

impl<'c> ProfileStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

/// Canonical form of a sample template: case and whitespace do not carry
/// identity information.
fn normalize_sample(sample: &str) -> String {
    sample
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl IdentityVerifier for ProfileStore<'_> {
    fn enroll(&self, student_id: &str, sample: &str) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO identity_profiles (student_id, fingerprint)
             VALUES (?1, ?2)
             ON CONFLICT(student_id) DO UPDATE SET fingerprint = excluded.fingerprint",
            params![student_id, normalize_sample(sample)],
        )?;
        Ok(())
    }

    fn identify(&self, sample: &str) -> AppResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT student_id FROM identity_profiles WHERE fingerprint = ?1")?;

        let student_id = stmt
            .query_row([normalize_sample(sample)], |row| row.get::<_, String>(0))
            .optional()?;

        Ok(student_id)
    }
}
