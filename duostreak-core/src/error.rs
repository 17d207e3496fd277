//! Error types for duostreak-core

use thiserror::Error;

/// Main error type for the duostreak-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Habit not found (or not owned by the caller)
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// Accountability partner not found
    #[error("partner not found for user: {0}")]
    PartnerNotFound(String),

    /// Malformed or out-of-range input (bad date, month outside 1..=12, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Motivation text service error
    #[error("motivation service error: {0}")]
    Motivation(String),
}

/// Result type alias for duostreak-core
pub type Result<T> = std::result::Result<T, Error>;
