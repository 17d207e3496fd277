//! Integration tests for the duostreak habit analytics core
//!
//! These tests exercise the full flow from check-in writes through the
//! service's analytics operations, over a real (in-memory or on-disk)
//! SQLite database.

use chrono::NaiveDate;
use duostreak_core::db::DateRange;
use duostreak_core::{Database, Error, Habit, HabitCategory, HabitService};
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    db
}

fn seed_habit(service: &HabitService, owner: &str, start: NaiveDate) -> Habit {
    service
        .create_habit(owner, "Morning run", HabitCategory::Health, start)
        .unwrap()
}

// ============================================
// Storage round-trip
// ============================================

#[test]
fn test_on_disk_database_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.db");

    let habit_id;
    {
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        let service = HabitService::new(&db);
        let habit = seed_habit(&service, "alice", day(2025, 3, 1));
        habit_id = habit.id.clone();
        service
            .record_check_in(&habit.id, day(2025, 3, 2), true, Some("windy"))
            .unwrap();
    }

    // Reopen and verify the data survived
    let db = Database::open(&path).unwrap();
    db.migrate().unwrap();
    let service = HabitService::new(&db);

    let history = service.get_history(&habit_id, None).unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].completed);
    assert_eq!(history[0].notes.as_deref(), Some("windy"));
}

#[test]
fn test_record_check_in_is_idempotent() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    service
        .record_check_in(&habit.id, day(2025, 3, 2), true, Some("note"))
        .unwrap();
    service
        .record_check_in(&habit.id, day(2025, 3, 2), true, Some("note"))
        .unwrap();

    let history = service.get_history(&habit.id, None).unwrap();
    assert_eq!(history.len(), 1, "same payload twice yields one record");
}

// ============================================
// Streak properties
// ============================================

#[test]
fn test_empty_history_zero_streaks() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    let streaks = service.compute_streak_at(&habit.id, day(2025, 3, 10)).unwrap();
    assert_eq!(streaks.current_streak, 0);
    assert_eq!(streaks.longest_streak, 0);
}

#[test]
fn test_trailing_completions_set_current_streak() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));
    let today = day(2025, 3, 20);

    // Exactly today and the 4 preceding days
    for d in 16..=20 {
        service
            .record_check_in(&habit.id, day(2025, 3, d), true, None)
            .unwrap();
    }

    let streaks = service.compute_streak_at(&habit.id, today).unwrap();
    assert_eq!(streaks.current_streak, 5);
    assert!(streaks.longest_streak >= streaks.current_streak);
}

#[test]
fn test_gap_bounds_longest_streak() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    // D, D+1, D+2, gap at D+3/D+4, D+5, D+6
    for d in [1, 2, 3, 6, 7] {
        service
            .record_check_in(&habit.id, day(2025, 3, d), true, None)
            .unwrap();
    }

    let streaks = service.compute_streak_at(&habit.id, day(2025, 3, 7)).unwrap();
    assert_eq!(streaks.longest_streak, 3);
    assert_eq!(streaks.current_streak, 2);
}

#[test]
fn test_missed_today_resets_current_not_longest() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    for d in 1..=6 {
        service
            .record_check_in(&habit.id, day(2025, 3, d), true, None)
            .unwrap();
    }

    // No check-in on the 8th: current streak 0, history intact
    let streaks = service.compute_streak_at(&habit.id, day(2025, 3, 8)).unwrap();
    assert_eq!(streaks.current_streak, 0);
    assert_eq!(streaks.longest_streak, 6);
}

// ============================================
// Weekly stats
// ============================================

#[test]
fn test_weekly_stats_best_day_and_score() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    // Window Mon 2025-03-03 ..= Sun 2025-03-09, completions Mon/Tue/Wed
    for d in [3, 4, 5] {
        service
            .record_check_in(&habit.id, day(2025, 3, d), true, None)
            .unwrap();
    }

    let stats = service
        .compute_weekly_stats(&habit.id, day(2025, 3, 9))
        .unwrap();

    assert_eq!(stats.best_day, "Monday");
    assert_eq!(stats.consistency_score, 43);
    assert_eq!(stats.day_stats.len(), 7);
    assert_eq!(stats.day_stats[0].date, day(2025, 3, 3));
    assert_eq!(stats.day_stats[6].date, day(2025, 3, 9));
}

#[test]
fn test_weekly_stats_empty_window() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    let stats = service
        .compute_weekly_stats(&habit.id, day(2025, 3, 9))
        .unwrap();

    assert_eq!(stats.consistency_score, 0);
    assert!(stats.average_time.is_none(), "absent, not zero");
    assert!(stats.day_stats.iter().all(|slot| !slot.completed));
}

// ============================================
// Calendar projection
// ============================================

#[test]
fn test_month_calendar_covers_every_day_once() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2024, 1, 15));

    service
        .record_check_in(&habit.id, day(2024, 2, 10), true, None)
        .unwrap();

    // Leap February
    let cal = service
        .compute_month_calendar_at(&habit.id, 2024, 2, day(2024, 2, 20))
        .unwrap();

    assert_eq!(cal.days.len(), 29);
    for (i, cal_day) in cal.days.iter().enumerate() {
        assert_eq!(cal_day.date, day(2024, 2, i as u32 + 1));
    }
    assert_eq!(
        cal.stats.completed_days + cal.stats.missed_days + cal.stats.future_days,
        cal.stats.total_days
    );
    assert_eq!(cal.stats.completed_days, 1);
}

#[test]
fn test_month_calendar_pre_start_dates_are_future() {
    let db = open_db();
    let service = HabitService::new(&db);
    // Habit starts mid-month, never checked in
    let habit = seed_habit(&service, "alice", day(2025, 3, 10));

    let cal = service
        .compute_month_calendar_at(&habit.id, 2025, 3, day(2025, 3, 20))
        .unwrap();

    for cal_day in &cal.days {
        let status = cal_day.status.as_str();
        if cal_day.date < day(2025, 3, 10) || cal_day.date > day(2025, 3, 20) {
            assert_eq!(status, "future", "date {}", cal_day.date);
        } else {
            assert_eq!(status, "missed", "date {}", cal_day.date);
        }
    }
}

#[test]
fn test_month_out_of_range_rejected() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    assert!(matches!(
        service.compute_month_calendar(&habit.id, 2025, 13),
        Err(Error::InvalidInput(_))
    ));
}

// ============================================
// Insight facts
// ============================================

#[test]
fn test_milestone_labels_for_streak_values() {
    let db = open_db();
    let service = HabitService::new(&db);

    // Streak of 7 -> milestone; 8 and 10 -> none
    for (len, expected) in [(7u32, Some("7-day")), (8, None), (10, None)] {
        let habit = service
            .create_habit(
                &format!("user-{}", len),
                "Read",
                HabitCategory::Learning,
                day(2025, 3, 1),
            )
            .unwrap();

        let today = day(2025, 3, 20);
        for back in 0..len {
            service
                .record_check_in(&habit.id, day(2025, 3, 20 - back), true, None)
                .unwrap();
        }

        let facts = service
            .build_insight_facts_at(&habit.id, None, today)
            .unwrap();
        assert_eq!(facts.current_streak, len);
        assert_eq!(facts.milestone.as_deref(), expected, "streak {}", len);
    }
}

#[test]
fn test_partner_comparison_count() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));
    let partner_habit = service
        .create_habit("bob", "Stretch", HabitCategory::Wellness, day(2025, 3, 1))
        .unwrap();
    service.pair_users("alice", "bob").unwrap();

    let today = day(2025, 3, 10);
    for d in [8, 9, 10] {
        service
            .record_check_in(&partner_habit.id, day(2025, 3, d), true, None)
            .unwrap();
    }
    // Partner completion outside the 7-day window is not counted
    service
        .record_check_in(&partner_habit.id, day(2025, 3, 1), true, None)
        .unwrap();

    let facts = service
        .build_insight_facts_at(&habit.id, None, today)
        .unwrap();
    assert_eq!(facts.partner_week_count, Some(3));

    // Explicit partner override takes precedence over the stored pairing
    let facts = service
        .build_insight_facts_at(&habit.id, Some("nobody"), today)
        .unwrap();
    assert_eq!(facts.partner_week_count, None);
}

// ============================================
// History queries
// ============================================

#[test]
fn test_history_is_date_ordered_and_range_bounded() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    for d in [14, 10, 12] {
        service
            .record_check_in(&habit.id, day(2025, 3, d), true, None)
            .unwrap();
    }

    let all = service.get_history(&habit.id, None).unwrap();
    let dates: Vec<NaiveDate> = all.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(2025, 3, 10), day(2025, 3, 12), day(2025, 3, 14)]);

    let bounded = service
        .get_history(
            &habit.id,
            Some(DateRange::new(day(2025, 3, 11), day(2025, 3, 13))),
        )
        .unwrap();
    assert_eq!(bounded.len(), 1);
    assert_eq!(bounded[0].date, day(2025, 3, 12));
}

// ============================================
// Lifecycle invariants
// ============================================

#[test]
fn test_one_active_habit_and_terminal_archive() {
    let db = open_db();
    let service = HabitService::new(&db);
    let habit = seed_habit(&service, "alice", day(2025, 3, 1));

    assert!(matches!(
        service.create_habit("alice", "Second", HabitCategory::Learning, day(2025, 3, 1)),
        Err(Error::InvalidInput(_))
    ));

    service.archive_habit(&habit.id).unwrap();
    assert!(matches!(
        service.archive_habit(&habit.id),
        Err(Error::InvalidInput(_))
    ));

    // Slot freed: a new active habit can be created
    service
        .create_habit("alice", "Second", HabitCategory::Learning, day(2025, 4, 1))
        .unwrap();
}
