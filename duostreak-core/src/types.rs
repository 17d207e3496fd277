//! Core domain types for duostreak
//!
//! These types represent the canonical data model for the
//! habit-accountability backend:
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A user's single active daily habit (archived habits keep history read-only) |
//! | **DayRecord** | One check-in per (habit, date): did the habit happen that day |
//! | **Partnership** | The one accountability partner paired with a user |
//! | **Encouragement** | A short message exchanged between partners (delivery is external) |
//!
//! Derived analytics types ([`StreakState`], [`WeeklyStats`],
//! [`CalendarMonth`], [`InsightFacts`]) are never persisted; they are
//! recomputed from stored [`DayRecord`]s on every request. Their serde
//! field names are camelCase to match the wire contract of the original
//! service.
//!
//! All dates are naive UTC calendar dates. Day boundaries do not shift
//! with user timezones.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Habit
// ============================================

/// Category a habit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    Health,
    Learning,
    Creativity,
    Productivity,
    Wellness,
}

impl HabitCategory {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Health => "health",
            HabitCategory::Learning => "learning",
            HabitCategory::Creativity => "creativity",
            HabitCategory::Productivity => "productivity",
            HabitCategory::Wellness => "wellness",
        }
    }

    /// Returns the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            HabitCategory::Health => "Health",
            HabitCategory::Learning => "Learning",
            HabitCategory::Creativity => "Creativity",
            HabitCategory::Productivity => "Productivity",
            HabitCategory::Wellness => "Wellness",
        }
    }
}

impl std::fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HabitCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" | "Health" => Ok(HabitCategory::Health),
            "learning" | "Learning" => Ok(HabitCategory::Learning),
            "creativity" | "Creativity" => Ok(HabitCategory::Creativity),
            "productivity" | "Productivity" => Ok(HabitCategory::Productivity),
            "wellness" | "Wellness" => Ok(HabitCategory::Wellness),
            _ => Err(format!("unknown habit category: {}", s)),
        }
    }
}

/// A user's daily habit.
///
/// A user owns at most one *active* habit at a time (enforced at
/// creation). Archiving is terminal: it sets `archived_at`, clears
/// `is_active`, and there is no un-archive. Archived habits retain
/// their full check-in history read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning user
    pub owner_id: String,
    /// Human-friendly name ("Morning run")
    pub name: String,
    /// Category
    pub category: HabitCategory,
    /// First day the habit is trackable; earlier dates are `future` in calendars
    pub start_date: NaiveDate,
    /// Whether this is the owner's current habit
    pub is_active: bool,
    /// Hidden from the partner's view when true
    pub is_private: bool,
    /// When the habit was created
    pub created_at: DateTime<Utc>,
    /// Set when the habit is archived (terminal)
    pub archived_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// Create a new active habit starting on the given date.
    pub fn new(owner_id: &str, name: &str, category: HabitCategory, start_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            category,
            start_date,
            is_active: true,
            is_private: false,
            created_at: Utc::now(),
            archived_at: None,
        }
    }
}

// ============================================
// DayRecord
// ============================================

/// One day's check-in for a habit.
///
/// At most one record exists per (habit, date); writes are
/// upsert-by-date, never append. "Completed false" and "no record" are
/// distinct in storage but deliberately conflated by the 7-day window
/// representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Habit this record belongs to
    pub habit_id: String,
    /// Calendar date (no time component)
    pub date: NaiveDate,
    /// Whether the habit was performed that day
    pub completed: bool,
    /// Time of day the user checked in, if recorded
    pub check_in_time: Option<NaiveTime>,
    /// Free-form note attached to the check-in
    pub notes: Option<String>,
}

// ============================================
// Partnership & Encouragement
// ============================================

/// Accountability pairing between two users.
///
/// Symmetric: stored once, looked up from either side. One partner per
/// user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partnership {
    pub user_id: String,
    pub partner_id: String,
    pub created_at: DateTime<Utc>,
}

/// A short encouragement message between partners.
///
/// Only storage lives here; notification delivery is an external
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encouragement {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl Encouragement {
    pub fn new(from_user: &str, to_user: &str, body: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from_user: from_user.to_string(),
            to_user: to_user.to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
        }
    }
}

// ============================================
// Derived: streaks
// ============================================

/// Current and longest streak for a habit.
///
/// Derived, never persisted: recomputed from the full check-in history
/// on every call so the numbers can never drift from stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    /// Consecutive completed days ending today (0 if today is not checked in)
    pub current_streak: u32,
    /// Longest run of consecutive completed days across all history
    pub longest_streak: u32,
}

// ============================================
// Derived: weekly window
// ============================================

/// One slot in a trailing 7-day window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    pub date: NaiveDate,
    /// Missing days are reported as `false`, indistinguishable from a
    /// check-in recorded as not completed.
    pub completed: bool,
    pub check_in_time: Option<NaiveTime>,
}

/// Per-weekday completion tally accumulated over a queried range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayTally {
    pub completed_count: u32,
    pub total_observed_count: u32,
}

impl WeekdayTally {
    /// Completion ratio; a weekday with zero observations has ratio 0.
    pub fn ratio(&self) -> f64 {
        if self.total_observed_count == 0 {
            0.0
        } else {
            f64::from(self.completed_count) / f64::from(self.total_observed_count)
        }
    }
}

/// Weekly analytics bundle for one habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    /// 7 slots, oldest first, ending at the reference date
    pub day_stats: Vec<DaySlot>,
    /// Weekday name with the best completion ratio in the window
    pub best_day: String,
    /// Average check-in time over completed days with a recorded time,
    /// rendered `H:MM` (24-hour). Absent when no such day exists.
    pub average_time: Option<String>,
    /// `round(100 * completed / observed)` over the window; 0 for an empty window
    pub consistency_score: u32,
}

// ============================================
// Derived: calendar month
// ============================================

/// Status of a single calendar day, relative to habit start and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Missed,
    Future,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Completed => "completed",
            DayStatus::Missed => "missed",
            DayStatus::Future => "future",
        }
    }
}

/// One projected day in a calendar month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Aggregate figures for a projected month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStats {
    pub completed_days: u32,
    pub missed_days: u32,
    pub future_days: u32,
    pub total_days: u32,
    /// `completed / total_days * 100`, rounded to 2 decimals. The
    /// denominator includes `future` days, matching the original
    /// service; see [`CalendarMonth::success_rate_elapsed`] for the
    /// corrected figure.
    pub success_rate: f64,
}

/// Every day of a (year, month) tagged completed/missed/future.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub stats: MonthStats,
}

// ============================================
// Derived: insight facts
// ============================================

/// Structured facts handed to the external motivation-text service.
///
/// This bundle is the sole input to text generation; nothing in this
/// crate knows how the text is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightFacts {
    pub habit_name: String,
    pub category: HabitCategory,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// 7-day completion grid, oldest first
    pub week_grid: Vec<bool>,
    /// Partner's completed-day count over the same 7 days, when paired
    pub partner_week_count: Option<u32>,
    pub best_day: String,
    pub worst_day: String,
    /// `"{N}-day"` when the current streak sits exactly on a milestone
    pub milestone: Option<String>,
}
