//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS habits (
        id               TEXT PRIMARY KEY,
        owner_id         TEXT NOT NULL,
        name             TEXT NOT NULL,
        category         TEXT NOT NULL,      -- 'health', 'learning', ...
        start_date       TEXT NOT NULL,      -- YYYY-MM-DD
        is_active        INTEGER NOT NULL DEFAULT 1,
        is_private       INTEGER NOT NULL DEFAULT 0,
        created_at       DATETIME NOT NULL,
        archived_at      DATETIME            -- set once, never cleared
    );

    CREATE INDEX IF NOT EXISTS idx_habits_owner ON habits(owner_id);

    -- One active habit per owner
    CREATE UNIQUE INDEX IF NOT EXISTS idx_habits_owner_active
        ON habits(owner_id) WHERE is_active = 1;

    CREATE TABLE IF NOT EXISTS check_ins (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        habit_id         TEXT NOT NULL REFERENCES habits(id),
        date             TEXT NOT NULL,      -- YYYY-MM-DD
        completed        INTEGER NOT NULL,
        check_in_time    TEXT,               -- HH:MM:SS
        notes            TEXT,

        -- Upsert-by-date semantics: at most one record per (habit, date)
        UNIQUE(habit_id, date)
    );

    CREATE INDEX IF NOT EXISTS idx_check_ins_habit_date ON check_ins(habit_id, date);

    -- One row per user; pairing writes both directions
    CREATE TABLE IF NOT EXISTS partnerships (
        user_id          TEXT PRIMARY KEY,
        partner_id       TEXT NOT NULL,
        created_at       DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS encouragements (
        id               TEXT PRIMARY KEY,
        from_user        TEXT NOT NULL,
        to_user          TEXT NOT NULL,
        body             TEXT NOT NULL,
        sent_at          DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_encouragements_to ON encouragements(to_user, sent_at);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
