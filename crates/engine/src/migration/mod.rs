//! Catalog migration jobs
//!
//! Catalog mutations that change where or how records are stored (counter
//! added or removed, element or platform renamed or deleted) are carried out
//! as ledger-tracked jobs:
//!
//! - `job`: what a job does and where it stands
//! - `ledger`: every job with its state and cursor
//! - `coordinator`: runs and resumes jobs

pub mod coordinator;
pub mod job;
pub mod ledger;

pub use coordinator::MigrationCoordinator;
pub use job::{FollowUp, JobCursor, JobState, MigrationJob, MigrationKind, Relocation};
pub use ledger::MigrationLedger;
