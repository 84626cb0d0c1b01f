use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::colors::{RESET, color_for_level};
use crate::utils::date;
use crate::utils::time::parse_optional_time;
use chrono::Local;

/// Flat alert feed: the anomaly report reshaped for dashboards.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Alerts {
        date: date_arg,
        asof,
    } = cmd
    {
        let d = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };
        let asof = parse_optional_time(asof.as_ref())?.unwrap_or_else(|| Local::now().time());

        let mut pool = DbPool::new(&cfg.database)?;

        let anomalies = reconcile::detect_anomalies(&mut pool, d, asof, cfg)?;
        let alerts = reconcile::generate_alerts(&anomalies);

        if alerts.is_empty() {
            success(format!("No alerts for {}.", d));
            return Ok(());
        }

        for alert in &alerts {
            println!(
                "{}[{}]{} {} => {}",
                color_for_level(alert.level),
                alert.level.as_str(),
                RESET,
                alert.student_id,
                alert.message
            );
        }
    }

    Ok(())
}
