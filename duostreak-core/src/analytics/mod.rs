//! Streak & consistency analytics engine
//!
//! Pure computation over per-day check-in records for one habit. No
//! storage, no networking: callers fetch history once (see
//! [`crate::service::HabitService`]) and every figure is recomputed
//! from those records, so derived numbers can never drift from the
//! stored history.
//!
//! - [`streak`]: current streak (strict backward chain ending today)
//!   and longest streak (maximum consecutive-date run)
//! - [`window`]: trailing 7-day grid, per-weekday tallies, best/worst
//!   day, average check-in time, consistency score
//! - [`calendar`]: month projection into completed/missed/future
//! - [`insight`]: milestone policy and the fact bundle handed to
//!   external text generation

pub mod calendar;
pub mod insight;
pub mod streak;
pub mod window;

pub use calendar::project_month;
pub use insight::{build_facts, milestone_label, MILESTONES};
pub use streak::compute_streaks;
pub use window::{
    average_check_in_time, best_day, consistency_score, week_window, weekday_tallies, worst_day,
};
