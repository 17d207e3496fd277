//! Windowed aggregation
//!
//! Trailing 7-day grids, per-weekday success tallies, average check-in
//! time, and the consistency score. The tally functions are generic
//! over any set of dated records; callers decide the query range.

use crate::types::{DayRecord, DaySlot, WeekdayTally};
use chrono::{Datelike, Days, NaiveDate, Timelike, Weekday};
use std::collections::HashMap;

/// Fixed weekday iteration order for tie-breaking: Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Build the trailing 7-day window `[reference-6, reference]`, oldest
/// first.
///
/// Days without a record get `completed = false`; "no record" and
/// "recorded as not completed" are indistinguishable here.
pub fn week_window(records: &[DayRecord], reference: NaiveDate) -> Vec<DaySlot> {
    let by_date: HashMap<NaiveDate, &DayRecord> =
        records.iter().map(|r| (r.date, r)).collect();

    (0..7)
        .rev()
        .filter_map(|back| reference.checked_sub_days(Days::new(back)))
        .map(|date| match by_date.get(&date) {
            Some(record) => DaySlot {
                date,
                completed: record.completed,
                check_in_time: record.check_in_time,
            },
            None => DaySlot {
                date,
                completed: false,
                check_in_time: None,
            },
        })
        .collect()
}

/// Accumulate per-weekday `{completed, observed}` tallies over the
/// supplied records, indexed Monday..Sunday.
pub fn weekday_tallies(records: &[DayRecord]) -> [WeekdayTally; 7] {
    let mut tallies = [WeekdayTally::default(); 7];
    for record in records {
        let idx = record.date.weekday().num_days_from_monday() as usize;
        tallies[idx].total_observed_count += 1;
        if record.completed {
            tallies[idx].completed_count += 1;
        }
    }
    tallies
}

/// Weekday with the highest completion ratio.
///
/// Ties break to the first weekday encountered in Monday-to-Sunday
/// order (strict greater-than). A weekday with zero observations has
/// ratio 0 and cannot beat any weekday with at least one completion.
pub fn best_day(tallies: &[WeekdayTally; 7]) -> &'static str {
    let mut best = WEEKDAYS[0];
    let mut best_ratio = tallies[0].ratio();
    for (i, weekday) in WEEKDAYS.iter().enumerate().skip(1) {
        let ratio = tallies[i].ratio();
        if ratio > best_ratio {
            best = *weekday;
            best_ratio = ratio;
        }
    }
    weekday_name(best)
}

/// Weekday with the lowest completion ratio; ties break to the first
/// weekday in Monday-to-Sunday order (strict less-than).
pub fn worst_day(tallies: &[WeekdayTally; 7]) -> &'static str {
    let mut worst = WEEKDAYS[0];
    let mut worst_ratio = tallies[0].ratio();
    for (i, weekday) in WEEKDAYS.iter().enumerate().skip(1) {
        let ratio = tallies[i].ratio();
        if ratio < worst_ratio {
            worst = *weekday;
            worst_ratio = ratio;
        }
    }
    weekday_name(worst)
}

/// Average check-in time over days that are both completed and carry a
/// recorded time, rendered `H:MM` (unpadded hour, 24-hour clock).
///
/// Returns `None` when no qualifying day exists; the average is absent,
/// never zero.
pub fn average_check_in_time(records: &[DayRecord]) -> Option<String> {
    let minutes: Vec<u32> = records
        .iter()
        .filter(|r| r.completed)
        .filter_map(|r| r.check_in_time)
        .map(|t| t.hour() * 60 + t.minute())
        .collect();

    if minutes.is_empty() {
        return None;
    }

    let total: u32 = minutes.iter().sum();
    let avg = (f64::from(total) / minutes.len() as f64).round() as u32;
    Some(format!("{}:{:02}", avg / 60, avg % 60))
}

/// `round(100 * completed / observed)`; 0 when nothing was observed.
pub fn consistency_score(completed_days: u32, total_observed_days: u32) -> u32 {
    if total_observed_days == 0 {
        return 0;
    }
    (100.0 * f64::from(completed_days) / f64::from(total_observed_days)).round() as u32
}
