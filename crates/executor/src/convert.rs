//! Error conversion from internal error types.
//!
//! This module provides conversions from `CeilingError` to the executor's
//! [`Error`] type.

use crate::Error;
use ceiling_core::CeilingError;

/// Convert a CeilingError to an executor Error.
///
/// This preserves all error details while mapping to the appropriate
/// executor error variant.
impl From<CeilingError> for Error {
    fn from(err: CeilingError) -> Self {
        match err {
            CeilingError::Validation { reason } => Error::InvalidInput { reason },
            CeilingError::NotFound { entity } => Error::NotFound { entity },
            CeilingError::AlreadyExists { entity } => Error::AlreadyExists { entity },
            CeilingError::CapacityExceeded {
                counter,
                current,
                requested,
                max,
            } => Error::CapacityExceeded {
                counter,
                current,
                requested,
                max,
            },
            CeilingError::MigrationInProgress { address } => {
                Error::MigrationInProgress { address }
            }
            CeilingError::MigrationIncomplete {
                job_id,
                processed,
                reason,
            } => Error::MigrationIncomplete {
                job_id,
                processed,
                reason,
            },
            CeilingError::JobNotFound { job_id } => Error::JobNotFound { job_id },
            CeilingError::Cancelled => Error::Cancelled,
            CeilingError::Storage { reason } => Error::Io { reason },
            CeilingError::Serialization { reason } => Error::Serialization { reason },
            CeilingError::Internal { reason } => Error::Internal { reason },
        }
    }
}

/// Convert a CeilingResult to an executor Result.
pub fn convert_result<T>(result: ceiling_core::CeilingResult<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}
