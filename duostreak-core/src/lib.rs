//! # duostreak-core
//!
//! Core library for duostreak - the backend engine of a two-person
//! habit-accountability application.
//!
//! This library provides:
//! - Domain types for habits, daily check-ins, and partnerships
//! - SQLite storage with upsert-by-date check-in semantics
//! - The streak & consistency analytics engine (streaks, 7-day windows,
//!   calendar projection, insight facts)
//! - A best-effort client for the external motivation-text service
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Stored check-in records are the only source of truth. Every derived
//! figure (streaks, weekly stats, calendars, insight facts) is
//! recomputed from them on each request; there are no incremental
//! counters to drift out of sync. Transport (HTTP routing, auth,
//! notification delivery) lives outside this crate and calls
//! [`service::HabitService`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use duostreak_core::{Config, Database, HabitService};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let service = HabitService::new(&db);
//! let streaks = service.compute_streak("habit-id").expect("streak");
//! println!("{} day streak", streaks.current_streak);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, DateRange};
pub use error::{Error, Result};
pub use service::HabitService;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod motivation;
pub mod service;
pub mod types;
