use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::gate::GateController;
use crate::db::pool::DbPool;
use crate::db::students;
use crate::errors::{AppError, AppResult};
use crate::models::gate_action::GateAction;
use crate::ui::messages::success;
use crate::utils::date;
use crate::utils::time::parse_optional_time;
use chrono::Local;

/// Manual check-in: the operator has already identified the student, so
/// the event is logged directly through the gate controller. `--failed`
/// records a denied attempt instead (broken reader, refused entry, ...).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin {
        student_id,
        action,
        reason,
        failed,
        date: date_arg,
        time: time_arg,
    } = cmd
    {
        let action = GateAction::from_code(action)
            .ok_or_else(|| AppError::InvalidAction(action.clone()))?;

        let now = Local::now().naive_local();
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => now.date(),
        };
        let t = parse_optional_time(time_arg.as_ref())?.unwrap_or_else(|| now.time());

        let mut pool = DbPool::new(&cfg.database)?;

        let student = students::require_student(&pool.conn, student_id)?;

        let success_flag = !*failed;
        let reason_text = match (reason, success_flag) {
            (Some(r), true) => format!("Manual check-in: {}", r),
            (None, true) => "Manual check-in".to_string(),
            (Some(r), false) => r.clone(),
            (None, false) => "Access denied".to_string(),
        };

        let ev = GateController::record_access(
            &mut pool,
            &student,
            action,
            success_flag,
            &reason_text,
            "manual",
            d.and_time(t),
        )?;

        success(format!(
            "{} {} for {} at {} {}",
            ev.action.to_db_str(),
            if ev.success { "granted" } else { "denied" },
            student.display_name(),
            ev.date_str(),
            ev.time_str(),
        ));
    }

    Ok(())
}
