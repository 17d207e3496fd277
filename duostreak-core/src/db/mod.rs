//! Database layer: SQLite storage for habits, check-ins, partnerships,
//! and encouragements.

pub mod repo;
pub mod schema;

pub use repo::{Database, DateRange};
