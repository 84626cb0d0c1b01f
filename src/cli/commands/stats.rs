use crate::config::Config;
use crate::core::reconcile;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};
use crate::utils::date;
use chrono::Local;

/// Live gate statistics for today (the CLI rendition of the monitoring
/// dashboard).
pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    let today = date::today();
    let now = Local::now().time();

    let stats = reconcile::live_stats(&mut pool, today, now, cfg)?;

    header(format!("Gate stats for {}", today));

    println!("{}• Enrolled students:{} {}", CYAN, RESET, stats.students);
    println!("{}• Events today:{} {}", CYAN, RESET, stats.events_today);
    println!(
        "{}• Success rate:{} {:.1}%",
        CYAN, RESET, stats.success_rate
    );
    println!("{}• Present today:{} {}", CYAN, RESET, stats.present_today);
    println!(
        "{}• Pending reviews:{} {}",
        CYAN, RESET, stats.pending_reviews
    );

    if stats.anomaly_count == 0 {
        println!("{}• System healthy: no anomalies.{}", GREEN, RESET);
    } else {
        println!(
            "{}• {} anomalies detected, run 'campusgate anomalies'.{}",
            RED, stats.anomaly_count, RESET
        );
    }

    println!();
    Ok(())
}
