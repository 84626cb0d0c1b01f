use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::anomaly::AnomalyLevel;
use crate::ui::messages::{header, success};
use crate::utils::colors::{RESET, color_for_level};
use crate::utils::date;
use crate::utils::time::parse_optional_time;
use chrono::Local;

/// Reconciliation report for one day.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Anomalies {
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

        header(format!("Reconciliation report for {}", d));

        if anomalies.is_empty() {
            success(format!("No anomalies detected for {}.", d));
            return Ok(());
        }

        let critical = anomalies
            .iter()
            .filter(|a| a.level == AnomalyLevel::Critical)
            .count();
        let warnings = anomalies.len() - critical;

        for a in &anomalies {
            println!(
                "{}[{}]{} {:<20} {:<12} {}",
                color_for_level(a.level),
                a.level.as_str(),
                RESET,
                a.code.as_str(),
                a.student_id,
                a.detail
            );
        }

        println!();
        println!(
            "{} anomalies ({} critical, {} warning).",
            anomalies.len(),
            critical,
            warnings
        );
    }

    Ok(())
}
