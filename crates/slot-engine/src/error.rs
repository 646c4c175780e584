//! Error types for slot-engine boundary operations.
//!
//! The availability computations themselves are infallible; errors only arise
//! when narrowing untrusted input (JSON documents, date and month keys).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// The availability document was not valid JSON or did not match the wire shape.
    #[error("Invalid availability JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A timestamp field could not be parsed (strict parsing only).
    #[error("Invalid timestamp in {field}: '{value}'")]
    InvalidTimestamp { field: String, value: String },

    /// A slot id was not an integer in `i64` range (strict parsing only).
    #[error("Invalid slot id in {field}: {value}")]
    InvalidId { field: String, value: String },

    #[error("Invalid date (expected YYYY-MM-DD): '{0}'")]
    InvalidDate(String),

    #[error("Invalid month (expected YYYY-MM): '{0}'")]
    InvalidMonth(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
