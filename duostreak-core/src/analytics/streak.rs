//! Streak calculation
//!
//! Both figures are strict-chain definitions over calendar dates:
//! a single missing or not-completed day terminates a run.

use crate::types::{DayRecord, StreakState};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Compute current and longest streak from a habit's full history.
///
/// Records may arrive in any order; only `completed = true` records
/// participate.
pub fn compute_streaks(records: &[DayRecord], today: NaiveDate) -> StreakState {
    StreakState {
        current_streak: current_streak(records, today),
        longest_streak: longest_streak(records),
    }
}

/// Consecutive completed days ending at `today`, walking backward.
///
/// Today itself must be completed to count as day 1; if today has no
/// completed record the streak is 0 even when yesterday was completed.
pub fn current_streak(records: &[DayRecord], today: NaiveDate) -> u32 {
    let completed: HashSet<NaiveDate> = records
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.date)
        .collect();

    let mut streak = 0;
    let mut day = today;
    while completed.contains(&day) {
        streak += 1;
        day = match day.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}

/// Maximum run of consecutive completed dates across all history.
///
/// Completed dates are sorted ascending; a gap of exactly 1 day extends
/// the running run, any other gap (0 for a duplicate date, >1 for a
/// miss) starts a new run at length 1.
pub fn longest_streak(records: &[DayRecord]) -> u32 {
    let mut dates: Vec<NaiveDate> = records
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.date)
        .collect();
    dates.sort_unstable();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for date in dates {
        run = match prev {
            Some(prev) if (date - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    longest
}
