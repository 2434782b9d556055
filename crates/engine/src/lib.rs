//! Counter engine for Ceiling
//!
//! This crate orchestrates the core traits over a value store and catalog:
//! - Record lifecycle: create, list, get, delete records
//! - Bounded increments and ceiling changes
//! - Catalog migrations: ledger-tracked, resumable, cancellable jobs
//! - Single-flight guard keyed by set address
//! - Configuration (`ceiling.toml`)
//! - `CounterService`: the catalog CRUD layer tying it together
//!
//! The engine is the only component that knows about:
//! - Catalog/store ordering for each catalog mutation
//! - Migration job state

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod guard;
pub mod increment;
pub mod lifecycle;
pub mod migration;
mod resolve;
pub mod service;

pub use cancel::CancelToken;
pub use config::{CeilingConfig, IncrementMode, MigrationConfig, CONFIG_FILE_NAME};
pub use guard::{GuardClaim, MigrationGuard};
pub use increment::{IncrementEngine, OverflowCheck};
pub use lifecycle::{RecordCollector, RecordManager};
pub use migration::{
    FollowUp, JobCursor, JobState, MigrationCoordinator, MigrationJob, MigrationKind,
    MigrationLedger, Relocation,
};
pub use service::CounterService;
