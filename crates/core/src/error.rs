//! Error types for the counter system
//!
//! This module defines the single error type used by every library crate.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! | Category | Variants | Mutation before failure |
//! |----------|----------|-------------------------|
//! | Validation | `Validation` | none |
//! | Lookup | `NotFound`, `AlreadyExists`, `JobNotFound` | none |
//! | Ceiling | `CapacityExceeded` | none |
//! | Coordination | `MigrationInProgress`, `Cancelled` | none |
//! | Migration | `MigrationIncomplete` | catalog committed, records split |
//! | System | `Storage`, `Serialization`, `Internal` | unspecified |

use thiserror::Error;

/// Result type alias for counter operations
pub type CeilingResult<T> = std::result::Result<T, CeilingError>;

/// Error types for the counter system
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CeilingError {
    /// Malformed or out-of-range input, or a failed bulk ceiling-safety check
    #[error("validation error: {reason}")]
    Validation {
        /// Human-readable reason
        reason: String,
    },

    /// A record, counter, catalog row or stored value is absent
    #[error("not found: {entity}")]
    NotFound {
        /// Description of the missing entity
        entity: String,
    },

    /// Duplicate record id (or duplicate catalog row)
    #[error("already exists: {entity}")]
    AlreadyExists {
        /// Description of the duplicate entity
        entity: String,
    },

    /// Increment would push a value past its ceiling
    #[error("capacity exceeded for counter {counter}: {current} + {requested} > {max}")]
    CapacityExceeded {
        /// Counter slug
        counter: String,
        /// Value observed before the increment
        current: i64,
        /// Requested delta
        requested: i64,
        /// Counter ceiling
        max: i64,
    },

    /// Another catalog mutation currently holds this set address
    #[error("migration in progress for {address}")]
    MigrationInProgress {
        /// Set address (`platform/element`)
        address: String,
    },

    /// A migration job stopped before visiting every record
    ///
    /// The catalog change that triggered the job has already been committed.
    /// The job can be resumed from its cursor.
    #[error("migration job {job_id} incomplete after {processed} records: {reason}")]
    MigrationIncomplete {
        /// Ledger id of the interrupted job
        job_id: u64,
        /// Records successfully processed before the interruption
        processed: u64,
        /// Why the job stopped
        reason: String,
    },

    /// Unknown migration job id
    #[error("migration job not found: {job_id}")]
    JobNotFound {
        /// Requested job id
        job_id: u64,
    },

    /// Operation was cancelled through its cancel token
    #[error("operation cancelled")]
    Cancelled,

    /// Value store failure (including use after shutdown)
    #[error("storage error: {reason}")]
    Storage {
        /// Human-readable reason
        reason: String,
    },

    /// Configuration or payload (de)serialization failure
    #[error("serialization error: {reason}")]
    Serialization {
        /// Human-readable reason
        reason: String,
    },

    /// Invariant violation (bug)
    #[error("internal error: {reason}")]
    Internal {
        /// Human-readable reason
        reason: String,
    },
}

impl CeilingError {
    /// Create a validation error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        CeilingError::Validation {
            reason: reason.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        CeilingError::NotFound {
            entity: entity.into(),
        }
    }

    /// Create an already-exists error
    pub fn already_exists(entity: impl Into<String>) -> Self {
        CeilingError::AlreadyExists {
            entity: entity.into(),
        }
    }

    /// Create a storage error
    pub fn storage(reason: impl Into<String>) -> Self {
        CeilingError::Storage {
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        CeilingError::Serialization {
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        CeilingError::Internal {
            reason: reason.into(),
        }
    }

    /// True for `NotFound` and `JobNotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CeilingError::NotFound { .. } | CeilingError::JobNotFound { .. }
        )
    }

    /// True for `Validation`
    pub fn is_validation(&self) -> bool {
        matches!(self, CeilingError::Validation { .. })
    }

    /// True when retrying the same request later may succeed
    ///
    /// A held guard frees up once the other migration finishes; an
    /// incomplete migration can be resumed; storage errors may be transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CeilingError::MigrationInProgress { .. }
                | CeilingError::MigrationIncomplete { .. }
                | CeilingError::Storage { .. }
        )
    }
}
