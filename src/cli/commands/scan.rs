use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::gate::GateController;
use crate::core::identity::{IdentityVerifier, ProfileStore};
use crate::db::pool::DbPool;
use crate::db::students;
use crate::errors::{AppError, AppResult};
use crate::models::gate_action::GateAction;
use crate::models::student::Student;
use crate::ui::messages::{info, success, warning};
use crate::utils::date;
use crate::utils::time::parse_optional_time;
use chrono::Local;

/// Process a gate scan: resolve the identity (biometric sample first,
/// then RFID), then log the access attempt through the gate controller.
///
/// A credential that matches nobody is a normal outcome, not an error:
/// the operator is pointed at manual check-in and nothing is written.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan {
        rfid,
        sample,
        action,
        date: date_arg,
        time: time_arg,
    } = cmd
    {
        if rfid.is_none() && sample.is_none() {
            return Err(AppError::InvalidInput(
                "provide at least one credential: --rfid or --sample".into(),
            ));
        }

        let action = GateAction::from_code(action)
            .ok_or_else(|| AppError::InvalidAction(action.clone()))?;

        //
        // 1. Resolve event timestamp (defaults: today, now)
        //
        let now = Local::now().naive_local();
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => now.date(),
        };
        let t = parse_optional_time(time_arg.as_ref())?.unwrap_or_else(|| now.time());

        let mut pool = DbPool::new(&cfg.database)?;

        //
        // 2. Identity verification
        //
        let mut resolved: Option<(Student, &'static str, &'static str)> = None;

        if let Some(sample) = sample {
            let store = ProfileStore::new(&pool.conn);
            if let Some(student_id) = store.identify(sample)? {
                let student = students::require_student(&pool.conn, &student_id)?;
                resolved = Some((student, "face_scan", "Biometric match"));
            }
        }

        if resolved.is_none()
            && let Some(tag) = rfid
            && let Some(student) = students::find_by_rfid(&pool.conn, tag)?
        {
            resolved = Some((student, "rfid", "RFID validated"));
        }

        //
        // 3. No match → manual check-in fallback
        //
        let Some((student, method, reason)) = resolved else {
            warning("No matching student found.");
            info("Direct the student to manual check-in: campusgate checkin <STUDENT_ID>");
            return Ok(());
        };

        //
        // 4. Log through the gate controller
        //
        let ev = GateController::record_access(
            &mut pool,
            &student,
            action,
            true,
            reason,
            "gate",
            d.and_time(t),
        )?;

        success(format!(
            "{} {} for {} at {} {} via {}",
            ev.action.to_db_str(),
            if ev.success { "granted" } else { "denied" },
            student.display_name(),
            ev.date_str(),
            ev.time_str(),
            method
        ));
    }

    Ok(())
}
