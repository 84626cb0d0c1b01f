use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::identity::{IdentityVerifier, ProfileStore};
use crate::db::pool::DbPool;
use crate::db::{log, students};
use crate::errors::AppResult;
use crate::models::student::Student;
use crate::ui::messages::{info, success};
use chrono::Local;

/// Register a student in the identity registry, optionally with an RFID
/// tag and a biometric sample.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Enroll {
        student_id,
        name,
        rfid,
        guardian,
        sample,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let student = Student {
            id: 0,
            student_id: student_id.clone(),
            full_name: name.clone().unwrap_or_default(),
            rfid_tag: rfid.clone(),
            guardian_email: guardian.clone().unwrap_or_default(),
            created_at: Local::now().to_rfc3339(),
        };

        students::insert_student(&pool.conn, &student)?;

        if let Some(sample) = sample {
            let store = ProfileStore::new(&pool.conn);
            store.enroll(student_id, sample)?;
            info(format!("Biometric sample enrolled for {}.", student_id));
        }

        log::ttlog(
            &pool.conn,
            "enroll",
            student_id,
            &format!(
                "Enrolled{}{}",
                if student.full_name.is_empty() {
                    String::new()
                } else {
                    format!(" {}", student.full_name)
                },
                if student.rfid_tag.is_some() {
                    " with RFID tag"
                } else {
                    ""
                }
            ),
        )?;

        success(format!("Student {} enrolled.", student_id));
    }

    Ok(())
}
