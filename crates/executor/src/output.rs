//! Output enum for command execution results.
//!
//! Every command produces exactly one output type. This mapping is
//! deterministic: the same command always produces the same output variant
//! (though the values may differ based on store state).

use serde::{Deserialize, Serialize};

use ceiling_core::{CounterDef, Element, Platform, RecordView};
use ceiling_engine::MigrationJob;

use crate::types::status;

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output`
/// variant, documented on the command.
///
/// # Example
///
/// ```text
/// use ceiling_executor::{Command, Output, Executor};
///
/// match executor.execute(cmd)? {
///     Output::Value(v) => println!("now at {}", v),
///     _ => unreachable!("Increment always returns Value"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    // ==================== Primitive Results ====================
    /// No return value
    Unit,

    /// Entity removed
    Deleted,

    /// Counter value
    Value(i64),

    /// Liveness reply
    Pong { version: String },

    // ==================== Catalog ====================
    /// Newly created platform
    PlatformCreated(Platform),
    /// Platform row
    Platform(Platform),
    /// Platform rows
    Platforms(Vec<Platform>),

    /// Newly created element
    ElementCreated(Element),
    /// Element row
    Element(Element),
    /// Element rows
    Elements(Vec<Element>),

    /// Newly created counter
    CounterCreated(CounterDef),
    /// Counter row
    Counter(CounterDef),
    /// Counter rows
    Counters(Vec<CounterDef>),

    // ==================== Records ====================
    /// Newly created record
    RecordCreated(RecordView),
    /// One record
    Record(RecordView),
    /// Records of one element
    Records(Vec<RecordView>),

    // ==================== Migrations ====================
    /// One migration job
    Job(MigrationJob),
    /// Every migration job
    Jobs(Vec<MigrationJob>),
}

impl Output {
    /// Boundary status code: 201 for creates, 204 for deletes, 200 otherwise
    pub fn status_code(&self) -> u16 {
        match self {
            Output::PlatformCreated(_)
            | Output::ElementCreated(_)
            | Output::CounterCreated(_)
            | Output::RecordCreated(_) => status::CREATED,
            Output::Deleted => status::NO_CONTENT,
            _ => status::OK,
        }
    }
}
