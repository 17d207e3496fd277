//! Database repository layer
//!
//! Provides query and upsert operations for habits, check-ins,
//! partnerships, and encouragements. Check-in writes are always
//! upsert-by-date: the `UNIQUE(habit_id, date)` constraint plus
//! `ON CONFLICT DO UPDATE` make duplicate records impossible to store.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S";

/// Inclusive date range filter for history queries.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }
}

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Habit operations
    // ============================================

    /// Insert a new habit.
    ///
    /// Rejects the insert when the owner already has an active habit;
    /// archive the old one first.
    pub fn create_habit(&self, habit: &Habit) -> Result<()> {
        if habit.is_active && self.get_active_habit(&habit.owner_id)?.is_some() {
            return Err(Error::InvalidInput(format!(
                "user {} already has an active habit",
                habit.owner_id
            )));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO habits (id, owner_id, name, category, start_date,
                                is_active, is_private, created_at, archived_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                habit.id,
                habit.owner_id,
                habit.name,
                habit.category.as_str(),
                habit.start_date.format(DATE_FMT).to_string(),
                habit.is_active,
                habit.is_private,
                habit.created_at.to_rfc3339(),
                habit.archived_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        tracing::info!(habit_id = %habit.id, owner = %habit.owner_id, "Created habit");
        Ok(())
    }

    /// Get a habit by ID
    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM habits WHERE id = ?", [id], Self::row_to_habit)
            .optional()
            .map_err(Error::from)
    }

    /// Get a habit by ID, verifying ownership.
    ///
    /// Absent and foreign habits are indistinguishable to the caller.
    pub fn get_habit_for_owner(&self, id: &str, owner_id: &str) -> Result<Habit> {
        match self.get_habit(id)? {
            Some(habit) if habit.owner_id == owner_id => Ok(habit),
            _ => Err(Error::HabitNotFound(id.to_string())),
        }
    }

    /// Get the owner's active habit, if any
    pub fn get_active_habit(&self, owner_id: &str) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM habits WHERE owner_id = ? AND is_active = 1",
            [owner_id],
            Self::row_to_habit,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Update a habit's name and/or privacy. Other fields are immutable.
    pub fn update_habit(
        &self,
        id: &str,
        name: Option<&str>,
        is_private: Option<bool>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            r#"
            UPDATE habits SET
                name = COALESCE(?2, name),
                is_private = COALESCE(?3, is_private)
            WHERE id = ?1
            "#,
            params![id, name, is_private],
        )?;

        if changed == 0 {
            return Err(Error::HabitNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Archive a habit. Terminal: sets `archived_at`, clears
    /// `is_active`, and cannot be undone.
    pub fn archive_habit(&self, id: &str) -> Result<()> {
        let changed = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE habits SET is_active = 0, archived_at = ?2
                 WHERE id = ?1 AND archived_at IS NULL",
                params![id, Utc::now().to_rfc3339()],
            )?
        };

        if changed == 0 {
            return match self.get_habit(id)? {
                Some(_) => Err(Error::InvalidInput(format!("habit {} already archived", id))),
                None => Err(Error::HabitNotFound(id.to_string())),
            };
        }

        tracing::info!(habit_id = %id, "Archived habit");
        Ok(())
    }

    fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
        let category_str: String = row.get("category")?;
        let start_date_str: String = row.get("start_date")?;
        let created_at_str: String = row.get("created_at")?;
        let archived_at_str: Option<String> = row.get("archived_at")?;

        Ok(Habit {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            name: row.get("name")?,
            category: HabitCategory::from_str(&category_str).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    e.into(),
                )
            })?,
            start_date: parse_date(&start_date_str)?,
            is_active: row.get("is_active")?,
            is_private: row.get("is_private")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            archived_at: archived_at_str
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }

    // ============================================
    // Check-in operations
    // ============================================

    /// Insert or update the check-in for (habit, date).
    pub fn upsert_check_in(&self, record: &DayRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO check_ins (habit_id, date, completed, check_in_time, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(habit_id, date) DO UPDATE SET
                completed = excluded.completed,
                check_in_time = excluded.check_in_time,
                notes = excluded.notes
            "#,
            params![
                record.habit_id,
                record.date.format(DATE_FMT).to_string(),
                record.completed,
                record.check_in_time.map(|t| t.format(TIME_FMT).to_string()),
                record.notes,
            ],
        )?;
        Ok(())
    }

    /// Get a habit's check-in history ordered by date ascending,
    /// optionally bounded by an inclusive date range.
    pub fn get_history(&self, habit_id: &str, range: Option<DateRange>) -> Result<Vec<DayRecord>> {
        let conn = self.conn.lock().unwrap();

        let mut records = Vec::new();
        match range {
            Some(range) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM check_ins
                     WHERE habit_id = ?1 AND date >= ?2 AND date <= ?3
                     ORDER BY date ASC",
                )?;
                let rows = stmt.query_map(
                    params![
                        habit_id,
                        range.from.format(DATE_FMT).to_string(),
                        range.to.format(DATE_FMT).to_string(),
                    ],
                    Self::row_to_day_record,
                )?;
                for row in rows {
                    records.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM check_ins WHERE habit_id = ?1 ORDER BY date ASC",
                )?;
                let rows = stmt.query_map([habit_id], Self::row_to_day_record)?;
                for row in rows {
                    records.push(row?);
                }
            }
        }

        Ok(records)
    }

    /// Get all completed dates for a habit, ascending
    pub fn completed_dates(&self, habit_id: &str) -> Result<Vec<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT date FROM check_ins
             WHERE habit_id = ?1 AND completed = 1
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map([habit_id], |row| {
            let date_str: String = row.get(0)?;
            parse_date(&date_str)
        })?;

        let mut dates = Vec::new();
        for row in rows {
            dates.push(row?);
        }
        Ok(dates)
    }

    /// Count completed days within an inclusive range
    pub fn completed_count_in_range(
        &self,
        habit_id: &str,
        range: DateRange,
    ) -> Result<u32> {
        let conn = self.conn.lock().unwrap();
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM check_ins
             WHERE habit_id = ?1 AND completed = 1 AND date >= ?2 AND date <= ?3",
            params![
                habit_id,
                range.from.format(DATE_FMT).to_string(),
                range.to.format(DATE_FMT).to_string(),
            ],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    fn row_to_day_record(row: &Row) -> rusqlite::Result<DayRecord> {
        let date_str: String = row.get("date")?;
        let time_str: Option<String> = row.get("check_in_time")?;

        Ok(DayRecord {
            habit_id: row.get("habit_id")?,
            date: parse_date(&date_str)?,
            completed: row.get("completed")?,
            check_in_time: time_str.and_then(|s| NaiveTime::parse_from_str(&s, TIME_FMT).ok()),
            notes: row.get("notes")?,
        })
    }

    // ============================================
    // Partnership operations
    // ============================================

    /// Pair two users as accountability partners.
    ///
    /// Writes both directions so either side resolves in one lookup.
    /// Re-pairing first dissolves any partnership either user is part
    /// of, on both sides, so no row can keep pointing at a user who
    /// has moved on.
    pub fn set_partner(&self, user_id: &str, partner_id: &str) -> Result<()> {
        if user_id == partner_id {
            return Err(Error::InvalidInput(
                "cannot pair a user with themselves".to_string(),
            ));
        }

        let now = Utc::now().to_rfc3339();
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        // Dissolve existing pairings for both users, both directions
        for user in [user_id, partner_id] {
            let old_partner: Option<String> = tx
                .query_row(
                    "SELECT partner_id FROM partnerships WHERE user_id = ?",
                    [user],
                    |r| r.get(0),
                )
                .optional()?;
            if let Some(old_partner) = old_partner {
                tx.execute(
                    "DELETE FROM partnerships WHERE user_id IN (?1, ?2)",
                    params![user, old_partner],
                )?;
            }
        }

        tx.execute(
            "INSERT INTO partnerships (user_id, partner_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, partner_id, now],
        )?;
        tx.execute(
            "INSERT INTO partnerships (user_id, partner_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![partner_id, user_id, now],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Get a user's partner ID, if paired
    pub fn get_partner(&self, user_id: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT partner_id FROM partnerships WHERE user_id = ?",
            [user_id],
            |r| r.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    // ============================================
    // Encouragement operations
    // ============================================

    /// Store an encouragement message
    pub fn insert_encouragement(&self, msg: &Encouragement) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO encouragements (id, from_user, to_user, body, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                msg.id,
                msg.from_user,
                msg.to_user,
                msg.body,
                msg.sent_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List the most recent encouragements sent to a user
    pub fn list_encouragements_for(&self, user_id: &str, limit: usize) -> Result<Vec<Encouragement>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM encouragements WHERE to_user = ?1
             ORDER BY sent_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            let sent_at_str: String = row.get("sent_at")?;
            Ok(Encouragement {
                id: row.get("id")?,
                from_user: row.get("from_user")?,
                to_user: row.get("to_user")?,
                body: row.get("body")?,
                sent_at: DateTime::parse_from_rfc3339(&sent_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}

fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}
