//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Coded**: Each variant maps to one boundary status code

use serde::{Deserialize, Serialize};

use crate::types::status;

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Status |
/// |----------|----------|--------|
/// | Validation | `InvalidInput`, `Serialization` | 400 |
/// | Capacity | `CapacityExceeded` | 440 |
/// | Not Found | `NotFound`, `JobNotFound` | 441 |
/// | Duplicate | `AlreadyExists` | 442 |
/// | Coordination | `MigrationInProgress`, `Cancelled` | 409 |
/// | Migration | `MigrationIncomplete` | 500 |
/// | System | `Io`, `Internal` | 500 |
///
/// # Example
///
/// ```ignore
/// use ceiling_executor::{Command, Error, Executor};
///
/// match executor.execute(cmd) {
///     Ok(output) => { /* handle success */ }
///     Err(Error::CapacityExceeded { current, max, .. }) => {
///         println!("at {} of {}", current, max);
///     }
///     Err(e) => {
///         println!("Error: {}", e);
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Validation ====================
    /// Malformed or out-of-range input
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Command payload could not be decoded
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    // ==================== Ceiling ====================
    /// Increment would pass the counter ceiling
    #[error("capacity exceeded for counter {counter}: {current} + {requested} > {max}")]
    CapacityExceeded {
        counter: String,
        current: i64,
        requested: i64,
        max: i64,
    },

    // ==================== Not Found ====================
    /// Catalog row, record or stored value absent
    #[error("not found: {entity}")]
    NotFound { entity: String },

    /// Unknown migration job
    #[error("migration job not found: {job_id}")]
    JobNotFound { job_id: u64 },

    // ==================== Duplicate ====================
    /// Record id already taken
    #[error("already exists: {entity}")]
    AlreadyExists { entity: String },

    // ==================== Coordination ====================
    /// Another catalog mutation holds the set address
    #[error("migration in progress for {address}")]
    MigrationInProgress { address: String },

    /// Operation cancelled
    #[error("operation cancelled")]
    Cancelled,

    // ==================== Migration ====================
    /// Catalog change committed but its migration job stopped early
    #[error("migration job {job_id} incomplete after {processed} records: {reason}")]
    MigrationIncomplete {
        job_id: u64,
        processed: u64,
        reason: String,
    },

    // ==================== System ====================
    /// Value store failure
    #[error("I/O error: {reason}")]
    Io { reason: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Boundary status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput { .. } | Error::Serialization { .. } => status::BAD_REQUEST,
            Error::CapacityExceeded { .. } => status::CAPACITY_EXCEEDED,
            Error::NotFound { .. } | Error::JobNotFound { .. } => status::NOT_FOUND,
            Error::AlreadyExists { .. } => status::ALREADY_EXISTS,
            Error::MigrationInProgress { .. } | Error::Cancelled => status::CONFLICT,
            Error::MigrationIncomplete { .. } | Error::Io { .. } | Error::Internal { .. } => {
                status::INTERNAL
            }
        }
    }
}
