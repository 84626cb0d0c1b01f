use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::workflow;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date;
use crate::utils::time::{format_optional_time, parse_flag};

/// Operator verification of a single attendance record.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Verify {
        student_id,
        date: date_arg,
        status,
        notes,
    } = cmd
    {
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let verified = parse_flag(status)
            .ok_or_else(|| AppError::InvalidInput(format!("invalid --status value: {status}")))?;

        let mut pool = DbPool::new(&cfg.database)?;

        let record = workflow::verify_attendance(&mut pool, cfg, student_id, d, verified, notes)?;

        success(format!(
            "Attendance {} for {} on {} ({}; entry {}, exit {}).",
            if record.verified { "verified" } else { "unverified" },
            record.student_id,
            record.date_str(),
            record.presence_label(),
            format_optional_time(record.first_entry_time),
            format_optional_time(record.last_exit_time),
        ));
    }

    Ok(())
}
