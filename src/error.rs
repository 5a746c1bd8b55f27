//! Error types for program planning operations.
//!
//! Rule-check outcomes (conflicts, validation findings) are returned as
//! data. `PlannerError` covers operations that cannot proceed at all.

use thiserror::Error;

/// Errors that can occur while planning a program.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A session id did not resolve.
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// A stage id did not resolve.
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// A placement was checked and has blocking conflicts.
    #[error("Placement of session '{session_id}' rejected: {reason}")]
    PlacementRejected {
        /// Session that was being moved.
        session_id: String,
        /// First blocking conflict message.
        reason: String,
    },

    /// A time string could not be parsed.
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    /// A spreadsheet row could not be decoded.
    #[error("Sheet row {row}: {message}")]
    SheetRow {
        /// Zero-based row index inside the value range.
        row: usize,
        /// What was wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
