//! # Ceiling Executor
//!
//! The public API for Ceiling - bounded per-record counters under a
//! platform / element / counter catalog.
//!
//! This is the only crate users need to import. It provides:
//! - [`Executor`] - dispatches commands to the counter service
//! - [`Command`]/[`Output`] - serializable command interface
//! - [`Error`] - structured errors with boundary status codes
//! - [`Response`] - status code plus JSON body
//!
//! ## Quick Start
//!
//! ```text
//! use ceiling_executor::{CeilingConfig, Command, Executor};
//!
//! let executor = Executor::open(CeilingConfig::default())?;
//! executor.execute(Command::PlatformCreate { name: "Google".into() })?;
//! executor.execute(Command::ElementCreate {
//!     platform: "google".into(),
//!     name: "Account".into(),
//! })?;
//! ```
//!
//! ## Status codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 200 | OK |
//! | 201 | Created |
//! | 204 | Deleted |
//! | 400 | Validation failure |
//! | 409 | Set address busy with another migration |
//! | 440 | Capacity exceeded |
//! | 441 | Not found |
//! | 442 | Already exists |
//! | 500 | Store failure or incomplete migration |

#![warn(missing_docs)]

mod command;
mod convert;
mod error;
mod executor;
mod output;
mod types;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;
pub use types::*;

// Re-export core and engine types so users don't need those crates directly
pub use ceiling_core::{CounterDef, Element, Platform, Reading, RecordId, RecordView};
pub use ceiling_engine::{
    CeilingConfig, CounterService, IncrementMode, JobState, MigrationConfig, MigrationJob,
    MigrationKind, CONFIG_FILE_NAME,
};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
