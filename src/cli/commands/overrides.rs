use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::workflow;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date;

/// Apply an operator override to one (student, date).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Override {
        student_id,
        date: date_arg,
        override_type,
        reason,
    } = cmd
    {
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let mut pool = DbPool::new(&cfg.database)?;

        let outcome = workflow::apply_override(&mut pool, student_id, d, override_type, reason)?;

        success(format!(
            "Override applied: {} for {} on {}.",
            outcome.action_taken, outcome.student_id, d
        ));

        if outcome.notifications.guardian_notified {
            info("Guardian notified.");
        } else {
            info("No guardian contact on file; guardian not notified.");
        }
    }

    Ok(())
}
