use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::workflow;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date;

/// Daily batch approval. Approving does not clear anomalies; the
/// reconciliation report stays whatever it was.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Approve {
        date: date_arg,
        approver,
    } = cmd
    {
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let mut pool = DbPool::new(&cfg.database)?;

        let summary = workflow::approve_daily_attendance(&mut pool, d, approver)?;

        success(format!("Daily attendance approved for {}.", summary.date));
        println!();
        println!("  Total students : {}", summary.total);
        println!("  Present        : {}", summary.present);
        println!("  Absent         : {}", summary.absent);
        println!("  Approved by    : {}", summary.approved_by);
        println!("  Timestamp      : {}", summary.approval_timestamp);
    }

    Ok(())
}
