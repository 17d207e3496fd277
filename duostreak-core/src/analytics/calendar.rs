//! Calendar projection
//!
//! Classifies every date of a month into completed/missed/future for
//! calendar-grid rendering, plus the month's aggregate figures.

use crate::error::{Error, Result};
use crate::types::{CalendarDay, CalendarMonth, DayStatus, MonthStats};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// Last day of (year, month): the day before the 1st of the following
/// month, so variable month lengths and leap years fall out of chrono.
pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::InvalidInput(format!("invalid month: {}-{}", year, month)))
}

/// Project a month of a habit's history onto day statuses.
///
/// - `future`: before the habit started, or after `today`
/// - `completed`: a completed record exists on that date
/// - `missed`: everything else (no record, or recorded as not completed)
pub fn project_month(
    year: i32,
    month: u32,
    start_date: NaiveDate,
    today: NaiveDate,
    completed_dates: &HashSet<NaiveDate>,
) -> Result<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidInput(format!("invalid month: {}-{}", year, month)))?;
    let last = last_day_of_month(year, month)?;

    let mut days = Vec::with_capacity(last.day() as usize);
    let mut completed = 0u32;
    let mut missed = 0u32;
    let mut future = 0u32;

    let mut date = first;
    while date <= last {
        let status = if date < start_date || date > today {
            future += 1;
            DayStatus::Future
        } else if completed_dates.contains(&date) {
            completed += 1;
            DayStatus::Completed
        } else {
            missed += 1;
            DayStatus::Missed
        };
        days.push(CalendarDay { date, status });

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let total_days = last.day();
    let success_rate = round2(f64::from(completed) / f64::from(total_days) * 100.0);

    Ok(CalendarMonth {
        year,
        month,
        days,
        stats: MonthStats {
            completed_days: completed,
            missed_days: missed,
            future_days: future,
            total_days,
            success_rate,
        },
    })
}

impl CalendarMonth {
    /// Success rate over elapsed days only (future days excluded from
    /// the denominator).
    ///
    /// The default [`MonthStats::success_rate`] divides by every day of
    /// the month, future ones included, which undercounts the current
    /// in-progress month. That figure is kept for wire compatibility;
    /// this is the corrected variant.
    pub fn success_rate_elapsed(&self) -> f64 {
        let elapsed = self.stats.total_days - self.stats.future_days;
        if elapsed == 0 {
            return 0.0;
        }
        round2(f64::from(self.stats.completed_days) / f64::from(elapsed) * 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
