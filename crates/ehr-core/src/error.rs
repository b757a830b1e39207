//! Error types for the record store.
//!
//! Every failure the store can report maps onto one variant of [`Error`].
//! Each variant carries a stable string code (see [`Error::code`]) so that
//! callers on different nodes can agree on the failure without parsing
//! human-readable messages.

use std::fmt;
use thiserror::Error;

/// The unified error type for record store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A record with the same id is already on the ledger.
    #[error("EHR Data {id} already exists")]
    AlreadyExists { id: String },

    /// No record (or an empty value) is stored under the id.
    #[error("EHRData {id} does not exist")]
    NotFound { id: String },

    /// Stored bytes could not be parsed into a record.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A record could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Caller-supplied input was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// The ledger collaborator failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl Error {
    /// Stable error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Error::AlreadyExists { .. } => "EHR_ALREADY_EXISTS",
            Error::NotFound { .. } => "EHRData_NOT_FOUND",
            Error::Decode(_) => "EHR_DECODE_FAILED",
            Error::Encode(_) => "EHR_ENCODE_FAILED",
            Error::InvalidArgument(_) => "EHR_INVALID_ARGUMENT",
            Error::Ledger(LedgerError::Rejected { .. }) => "LEDGER_REJECTED",
            Error::Ledger(_) => "LEDGER_UNAVAILABLE",
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is a duplicate-creation error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }
}

/// Stored bytes that do not form a valid record.
#[derive(Debug)]
pub struct DecodeError {
    /// Ledger key the bytes were read from, when known.
    pub key: Option<String>,
    /// Parser message.
    pub message: String,
}

impl DecodeError {
    /// Create a new decode error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            key: None,
            message: message.into(),
        }
    }

    /// Attach the ledger key the offending value was stored under.
    pub fn at_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed record")?;
        if let Some(ref key) = self.key {
            write!(f, " at key '{}'", key)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::new(err.to_string())
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidArgumentError {
    /// Invalid record id.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Page size is not a positive integer.
    #[error("invalid page size '{value}': {reason}")]
    PageSize { value: String, reason: String },

    /// Invalid timestamp.
    #[error("invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },

    /// Malformed range query.
    #[error("invalid query '{value}': {reason}")]
    Query { value: String, reason: String },

    /// Bookmark rejected by the ledger.
    #[error("invalid bookmark '{value}': {reason}")]
    Bookmark { value: String, reason: String },

    /// Record payload rejected before it reached the ledger.
    #[error("invalid record: {reason}")]
    Record { reason: String },
}

/// Failures of the ledger collaborator itself.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Underlying storage I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted world state could not be read back.
    #[error("corrupt world state: {message}")]
    Corrupt { message: String },

    /// The ledger cannot hold this value. Nothing was written.
    #[error("value under '{key}' rejected: {reason}")]
    Rejected { key: String, reason: String },

    /// A writer panicked while holding the state lock.
    #[error("world state lock poisoned")]
    Poisoned,

    /// A paged scan returned more rows than were asked for.
    #[error("ledger returned more than {page_size} rows for one page")]
    Overfull { page_size: u32 },
}
