//! Boundary operations for the habit analytics core
//!
//! [`HabitService`] is what transport handlers (HTTP, CLI, jobs) call.
//! Each operation performs a small number of independent reads against
//! the store, then computes everything in memory: streaks and
//! aggregates are derived from the fetched history in one pass rather
//! than by per-date point queries, and nothing is cached between calls.
//!
//! Every analytics operation has an `*_at` variant taking an explicit
//! reference date; the plain variant supplies "today" as the naive UTC
//! calendar date.

use chrono::{Days, NaiveDate, Utc};

use crate::analytics::{
    build_facts, consistency_score, project_month, streak, week_window, weekday_tallies,
};
use crate::analytics::window::{average_check_in_time, best_day};
use crate::db::{Database, DateRange};
use crate::error::{Error, Result};
use crate::motivation::MotivationClient;
use crate::types::*;

/// Facade over the store and the pure analytics engine.
pub struct HabitService<'a> {
    db: &'a Database,
    motivation: Option<MotivationClient>,
}

impl<'a> HabitService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            motivation: None,
        }
    }

    /// Attach a motivation client. Generation stays best-effort; see
    /// [`HabitService::insight_with_motivation`].
    pub fn with_motivation(db: &'a Database, motivation: MotivationClient) -> Self {
        Self {
            db,
            motivation: Some(motivation),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // ============================================
    // Habit lifecycle
    // ============================================

    /// Create the owner's active habit. Fails if one already exists.
    pub fn create_habit(
        &self,
        owner_id: &str,
        name: &str,
        category: HabitCategory,
        start_date: NaiveDate,
    ) -> Result<Habit> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("habit name must not be empty".to_string()));
        }

        let habit = Habit::new(owner_id, name, category, start_date);
        self.db.create_habit(&habit)?;
        Ok(habit)
    }

    /// Rename a habit and/or change its privacy. Archived habits are
    /// read-only.
    pub fn update_habit(
        &self,
        habit_id: &str,
        name: Option<&str>,
        is_private: Option<bool>,
    ) -> Result<Habit> {
        if matches!(name, Some(n) if n.trim().is_empty()) {
            return Err(Error::InvalidInput("habit name must not be empty".to_string()));
        }

        let habit = self.require_habit(habit_id)?;
        if !habit.is_active {
            return Err(Error::InvalidInput(format!(
                "habit {} is archived and read-only",
                habit_id
            )));
        }

        self.db.update_habit(habit_id, name, is_private)?;
        self.db
            .get_habit(habit_id)?
            .ok_or_else(|| Error::HabitNotFound(habit_id.to_string()))
    }

    /// Archive a habit. Terminal; history stays readable.
    pub fn archive_habit(&self, habit_id: &str) -> Result<()> {
        self.db.archive_habit(habit_id)
    }

    // ============================================
    // Check-ins
    // ============================================

    /// Upsert the check-in for (habit, date).
    ///
    /// Completed check-ins are stamped with the current UTC time of
    /// day; recording the same date twice replaces the stored record.
    /// Archived habits are read-only.
    pub fn record_check_in(
        &self,
        habit_id: &str,
        date: NaiveDate,
        completed: bool,
        notes: Option<&str>,
    ) -> Result<DayRecord> {
        let habit = self
            .db
            .get_habit(habit_id)?
            .ok_or_else(|| Error::HabitNotFound(habit_id.to_string()))?;

        if !habit.is_active {
            return Err(Error::InvalidInput(format!(
                "habit {} is archived and read-only",
                habit_id
            )));
        }

        let record = DayRecord {
            habit_id: habit_id.to_string(),
            date,
            completed,
            check_in_time: completed.then(|| Utc::now().time()),
            notes: notes.map(str::to_string),
        };

        self.db.upsert_check_in(&record)?;

        tracing::debug!(habit_id, %date, completed, "Recorded check-in");
        Ok(record)
    }

    /// Ordered check-in history, optionally bounded by a date range.
    pub fn get_history(
        &self,
        habit_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<DayRecord>> {
        self.require_habit(habit_id)?;
        self.db.get_history(habit_id, range)
    }

    // ============================================
    // Analytics
    // ============================================

    /// Current and longest streak, recomputed from the full history.
    pub fn compute_streak(&self, habit_id: &str) -> Result<StreakState> {
        self.compute_streak_at(habit_id, Self::today())
    }

    /// Streaks relative to an explicit "today".
    pub fn compute_streak_at(&self, habit_id: &str, today: NaiveDate) -> Result<StreakState> {
        self.require_habit(habit_id)?;

        // One history fetch, then in-memory computation
        let records = self.db.get_history(habit_id, None)?;
        Ok(streak::compute_streaks(&records, today))
    }

    /// Weekly stats over the 7 days ending at `reference`.
    pub fn compute_weekly_stats(
        &self,
        habit_id: &str,
        reference: NaiveDate,
    ) -> Result<WeeklyStats> {
        self.require_habit(habit_id)?;

        let records = self.db.get_history(habit_id, Some(week_range(reference)))?;

        let day_stats = week_window(&records, reference);
        let tallies = weekday_tallies(&records);
        let completed_days = day_stats.iter().filter(|slot| slot.completed).count() as u32;

        Ok(WeeklyStats {
            best_day: best_day(&tallies).to_string(),
            average_time: average_check_in_time(&records),
            consistency_score: consistency_score(completed_days, day_stats.len() as u32),
            day_stats,
        })
    }

    /// Calendar projection for (year, month).
    pub fn compute_month_calendar(
        &self,
        habit_id: &str,
        year: i32,
        month: u32,
    ) -> Result<CalendarMonth> {
        self.compute_month_calendar_at(habit_id, year, month, Self::today())
    }

    /// Calendar projection relative to an explicit "today".
    pub fn compute_month_calendar_at(
        &self,
        habit_id: &str,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<CalendarMonth> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidInput(format!("month out of range: {}", month)));
        }

        let habit = self.require_habit(habit_id)?;
        let completed = self.db.completed_dates(habit_id)?.into_iter().collect();

        project_month(year, month, habit.start_date, today, &completed)
    }

    /// Assemble the insight fact bundle for a habit.
    ///
    /// `partner_id` overrides the stored partnership; when omitted, the
    /// owner's stored partner (if any) supplies the comparison count.
    pub fn build_insight_facts(
        &self,
        habit_id: &str,
        partner_id: Option<&str>,
    ) -> Result<InsightFacts> {
        self.build_insight_facts_at(habit_id, partner_id, Self::today())
    }

    /// Insight facts relative to an explicit "today".
    pub fn build_insight_facts_at(
        &self,
        habit_id: &str,
        partner_id: Option<&str>,
        today: NaiveDate,
    ) -> Result<InsightFacts> {
        let habit = self.require_habit(habit_id)?;

        let history = self.db.get_history(habit_id, None)?;
        let streaks = streak::compute_streaks(&history, today);

        let week = week_range(today);
        let week_records: Vec<DayRecord> = history
            .iter()
            .filter(|r| r.date >= week.from && r.date <= week.to)
            .cloned()
            .collect();
        let window = week_window(&week_records, today);
        let tallies = weekday_tallies(&week_records);

        let partner_week_count = self.partner_week_count(&habit, partner_id, week)?;

        Ok(build_facts(
            &habit,
            streaks,
            &window,
            &tallies,
            partner_week_count,
        ))
    }

    /// Insight facts plus optional motivation text.
    ///
    /// A motivation-service failure never fails this request: the text
    /// is omitted and the numeric facts are returned as-is.
    pub async fn insight_with_motivation(
        &self,
        habit_id: &str,
        partner_id: Option<&str>,
    ) -> Result<(InsightFacts, Option<String>)> {
        let facts = self.build_insight_facts(habit_id, partner_id)?;

        let text = match &self.motivation {
            Some(client) => match client.generate(&facts).await {
                Ok(response) => Some(response.text),
                Err(e) => {
                    tracing::warn!(error = %e, habit_id, "Motivation text unavailable, continuing without it");
                    None
                }
            },
            None => None,
        };

        Ok((facts, text))
    }

    // ============================================
    // Partnership & encouragement
    // ============================================

    /// Pair two users as accountability partners.
    pub fn pair_users(&self, user_id: &str, partner_id: &str) -> Result<()> {
        self.db.set_partner(user_id, partner_id)
    }

    /// Send a short encouragement to the sender's partner.
    pub fn send_encouragement(&self, from_user: &str, body: &str) -> Result<Encouragement> {
        if body.trim().is_empty() {
            return Err(Error::InvalidInput("encouragement must not be empty".to_string()));
        }

        let partner = self
            .db
            .get_partner(from_user)?
            .ok_or_else(|| Error::PartnerNotFound(from_user.to_string()))?;

        let message = Encouragement::new(from_user, &partner, body);
        self.db.insert_encouragement(&message)?;
        Ok(message)
    }

    // ============================================
    // Internals
    // ============================================

    fn require_habit(&self, habit_id: &str) -> Result<Habit> {
        self.db
            .get_habit(habit_id)?
            .ok_or_else(|| Error::HabitNotFound(habit_id.to_string()))
    }

    /// Partner's completed-day count over the same 7 days, when the
    /// partner exists and has an active habit; `None` otherwise.
    fn partner_week_count(
        &self,
        habit: &Habit,
        partner_id: Option<&str>,
        week: DateRange,
    ) -> Result<Option<u32>> {
        let partner = match partner_id {
            Some(id) => Some(id.to_string()),
            None => self.db.get_partner(&habit.owner_id)?,
        };

        let Some(partner) = partner else {
            return Ok(None);
        };

        match self.db.get_active_habit(&partner)? {
            Some(partner_habit) => Ok(Some(
                self.db.completed_count_in_range(&partner_habit.id, week)?,
            )),
            None => Ok(None),
        }
    }
}

/// Inclusive 7-day range ending at `reference`.
fn week_range(reference: NaiveDate) -> DateRange {
    let from = reference
        .checked_sub_days(Days::new(6))
        .unwrap_or(reference);
    DateRange::new(from, reference)
}
