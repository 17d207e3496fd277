//! Insight fact assembly
//!
//! Builds the structured fact bundle consumed by the external
//! motivation-text service, and owns the milestone policy. Nothing here
//! knows how the downstream text is produced.

use crate::types::{DaySlot, Habit, InsightFacts, StreakState, WeekdayTally};

use super::window::{best_day, worst_day};

/// Streak lengths that trigger a milestone.
///
/// Exact membership, not "every 7th day": 8 is not a milestone, 14 is.
pub const MILESTONES: [u32; 5] = [7, 14, 30, 50, 100];

/// Milestone label for a streak length, `"{N}-day"` when the streak
/// sits exactly on a milestone.
pub fn milestone_label(streak: u32) -> Option<String> {
    if MILESTONES.contains(&streak) {
        Some(format!("{}-day", streak))
    } else {
        None
    }
}

/// Assemble the fact bundle for one habit.
///
/// `window` is the trailing 7-day grid (oldest first), `tallies` the
/// per-weekday ratios over whatever range the caller queried, and
/// `partner_week_count` the partner's completed-day count over the same
/// 7 days when the user is paired.
pub fn build_facts(
    habit: &Habit,
    streaks: StreakState,
    window: &[DaySlot],
    tallies: &[WeekdayTally; 7],
    partner_week_count: Option<u32>,
) -> InsightFacts {
    InsightFacts {
        habit_name: habit.name.clone(),
        category: habit.category,
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
        week_grid: window.iter().map(|slot| slot.completed).collect(),
        partner_week_count,
        best_day: best_day(tallies).to_string(),
        worst_day: worst_day(tallies).to_string(),
        milestone: milestone_label(streaks.current_streak),
    }
}
