use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile;
use crate::db::pool::DbPool;
use crate::db::{attendance, queries};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::gate_event::GateEvent;
use crate::utils::date;
use crate::utils::table::Table;
use crate::utils::time::format_optional_time;
use chrono::NaiveDate;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        period,
        events: events_only,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        let dates = resolve_period(period)?;

        print_period_header(period);

        let mut printed_any = false;
        for d in dates {
            if *events_only {
                let events = queries::load_events_by_date(&mut pool, &d)?;
                if events.is_empty() {
                    continue;
                }
                printed_any = true;
                print_events(&d, &events);
            } else {
                let records = attendance::load_by_date(&mut pool, &d)?;
                if records.is_empty() {
                    continue;
                }
                printed_any = true;
                let summary = reconcile::daily_summary(&mut pool, d)?;
                println!(
                    "📅 {} | {} records, {} present, {} absent",
                    d, summary.total, summary.present, summary.absent
                );
                print_records(&records, &cfg.separator_char);
            }
        }

        if !printed_any {
            println!("No data for the selected period.");
        }
    }
    Ok(())
}

fn resolve_period(period: &Option<String>) -> AppResult<Vec<NaiveDate>> {
    match period {
        Some(p) => date::generate_from_period(p).map_err(AppError::InvalidDate),
        None => Ok(vec![date::today()]),
    }
}

fn print_period_header(period: &Option<String>) {
    if let Some(p) = period {
        match p.len() {
            4 => println!("📅 Attendance log for year {}:\n", p),
            7 => {
                let month = p.get(5..7).map(date::month_name).unwrap_or("Unknown");
                println!("📅 Attendance log for {} {}:\n", month, &p[0..4]);
            }
            _ => {}
        }
    }
}

fn print_records(records: &[AttendanceRecord], separator: &str) {
    let mut table = Table::with_headers(&[
        "Student", "Presence", "Entry", "Exit", "Verified", "Approved",
    ]);

    for r in records {
        table.add_row(vec![
            r.student_id.clone(),
            r.presence_label().to_string(),
            format_optional_time(r.first_entry_time),
            format_optional_time(r.last_exit_time),
            if r.verified { "yes" } else { "no" }.to_string(),
            if r.approved { "yes" } else { "no" }.to_string(),
        ]);
    }

    print!("{}", table.render());
    println!("{}", separator.repeat(25));
}

fn print_events(d: &NaiveDate, events: &[GateEvent]) {
    println!("📅 Gate events for {}:\n", d);

    let mut table = Table::with_headers(&["Id", "Time", "Student", "Action", "Outcome", "Source", "Reason"]);
    for ev in events {
        table.add_row(vec![
            ev.id.to_string(),
            ev.time_str(),
            ev.student_id.clone(),
            ev.action.to_db_str().to_string(),
            if ev.success { "ok" } else { "denied" }.to_string(),
            ev.source.clone(),
            ev.reason.clone(),
        ]);
    }

    print!("{}", table.render());
}
