//! Error types for tslice operations.

use thiserror::Error;

/// All possible errors that can occur in tslice operations.
#[derive(Debug, Error)]
pub enum TsError {
    #[error("unable to parse timestamp from {0:?}")]
    Timestamp(String),

    #[error("unable to parse {token:?} in duration {input:?}")]
    Duration { input: String, token: String },

    #[error("found {0} months; month-bearing durations need parse_duration_with")]
    Months(i64),

    #[error("slice steps of kind {0:?} do not work")]
    Step(&'static str),

    #[error("slice step cannot be zero")]
    ZeroStep,

    #[error("slice indices must be integers or absent, not {0:?}")]
    Index(&'static str),

    #[error("cannot cast {value} to {target}")]
    Cast {
        value: String,
        target: &'static str,
    },

    #[error("unsupported operand kinds for {op}: {lhs} and {rhs}")]
    Arithmetic {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("attribute not found: {0}")]
    AttrNotFound(String),

    #[error("read-only store: {0}")]
    ReadOnly(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tslice operations.
pub type Result<T> = std::result::Result<T, TsError>;
