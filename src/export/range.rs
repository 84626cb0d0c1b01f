// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

/// Parse --range (year / month / day / interval).
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub(crate) fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(AppError::InvalidInput(
                "start and end must have same format".into(),
            ));
        }

        match start.len() {
            // YYYY:YYYY
            4 => {
                let ys: i32 = start
                    .parse()
                    .map_err(|_| AppError::InvalidInput("invalid start year".into()))?;
                let ye: i32 = end
                    .parse()
                    .map_err(|_| AppError::InvalidInput("invalid end year".into()))?;

                let d1 = NaiveDate::from_ymd_opt(ys, 1, 1)
                    .ok_or_else(|| AppError::InvalidDate(start.to_string()))?;
                let d2 = NaiveDate::from_ymd_opt(ye, 12, 31)
                    .ok_or_else(|| AppError::InvalidDate(end.to_string()))?;
                Ok((d1, d2))
            }
            // YYYY-MM:YYYY-MM
            7 => {
                let d1 = first_of_month(start)?;
                let d2 = last_of_month(end)?;
                Ok((d1, d2))
            }
            // YYYY-MM-DD:YYYY-MM-DD
            10 => {
                let d1 = NaiveDate::parse_from_str(start, "%Y-%m-%d")
                    .map_err(|_| AppError::InvalidDate(start.to_string()))?;
                let d2 = NaiveDate::parse_from_str(end, "%Y-%m-%d")
                    .map_err(|_| AppError::InvalidDate(end.to_string()))?;
                Ok((d1, d2))
            }
            _ => Err(AppError::InvalidInput("unsupported range format".into())),
        }
    } else {
        match r.len() {
            // YYYY
            4 => {
                let y: i32 = r
                    .parse()
                    .map_err(|_| AppError::InvalidInput("invalid year".into()))?;
                let d1 = NaiveDate::from_ymd_opt(y, 1, 1)
                    .ok_or_else(|| AppError::InvalidDate(r.to_string()))?;
                let d2 = NaiveDate::from_ymd_opt(y, 12, 31)
                    .ok_or_else(|| AppError::InvalidDate(r.to_string()))?;
                Ok((d1, d2))
            }
            // YYYY-MM
            7 => {
                let d1 = first_of_month(r)?;
                let d2 = last_of_month(r)?;
                Ok((d1, d2))
            }
            // YYYY-MM-DD
            10 => {
                let d = NaiveDate::parse_from_str(r, "%Y-%m-%d")
                    .map_err(|_| AppError::InvalidDate(r.to_string()))?;
                Ok((d, d))
            }
            _ => Err(AppError::InvalidInput(
                "unsupported --range format".into(),
            )),
        }
    }
}

fn first_of_month(ym: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{ym}-01"), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(ym.to_string()))
}

fn last_of_month(ym: &str) -> AppResult<NaiveDate> {
    let first = first_of_month(ym)?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let next = next.ok_or_else(|| AppError::InvalidDate(ym.to_string()))?;
    next.pred_opt()
        .ok_or_else(|| AppError::InvalidDate(ym.to_string()))
}
