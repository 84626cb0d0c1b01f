use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date;
use crate::utils::table::Table;
use crate::utils::time::format_optional_time;

/// Attendance records still waiting for operator confirmation.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Pending { date: date_arg } = cmd {
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let mut pool = DbPool::new(&cfg.database)?;

        let records = reconcile::pending_reviews(&mut pool, d)?;

        if records.is_empty() {
            success(format!("No pending reviews for {}.", d));
            return Ok(());
        }

        println!("🔎 Pending reviews for {} ({}):\n", d, records.len());

        let mut table = Table::with_headers(&["Student", "Presence", "Entry", "Exit", "Override"]);
        for r in &records {
            table.add_row(vec![
                r.student_id.clone(),
                r.presence_label().to_string(),
                format_optional_time(r.first_entry_time),
                format_optional_time(r.last_exit_time),
                r.override_reason.clone(),
            ]);
        }

        print!("{}", table.render());
    }

    Ok(())
}
