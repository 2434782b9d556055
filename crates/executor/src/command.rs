//! Command enum defining all Ceiling operations.
//!
//! Commands are the "instruction set" of the counter service. Every
//! operation that can be performed is represented as a variant of this enum.
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON for cross-language use
//! - **Pure data**: No closures or executable code
//!
//! Catalog rows are named by slug. Record ids and deltas are raw JSON values,
//! parsed when the command executes.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A command is a self-contained, serializable operation.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Service | 2 | Liveness and store health |
/// | Platform | 4 | Group CRUD |
/// | Element | 4 | Sub-group CRUD |
/// | Counter | 4 | Counter definition CRUD |
/// | Record | 6 | Record lifecycle and bounded increments |
/// | Migration | 4 | Job inspection, resume and cancellation |
///
/// # Example
///
/// ```json
/// {"Increment": {"platform": "google", "element": "account",
///                "record": 42, "counter": "requests", "delta": 5}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Service (2) ====================
    /// Liveness check.
    /// Returns: `Output::Pong`
    Ping,

    /// Value-store health check.
    /// Returns: `Output::Unit`
    Health,

    // ==================== Platform (4) ====================
    /// Create a platform; its slug is derived from `name`.
    /// Returns: `Output::PlatformCreated`
    PlatformCreate { name: String },

    /// Rename a platform and relocate its records.
    /// Returns: `Output::Platform`
    PlatformRename { platform: String, name: String },

    /// Delete a platform with its elements, counters and records.
    /// Returns: `Output::Deleted`
    PlatformDelete { platform: String },

    /// List platforms.
    /// Returns: `Output::Platforms`
    PlatformList,

    // ==================== Element (4) ====================
    /// Create an element under a platform.
    /// Returns: `Output::ElementCreated`
    ElementCreate { platform: String, name: String },

    /// Rename an element and relocate its records.
    /// Returns: `Output::Element`
    ElementRename {
        platform: String,
        element: String,
        name: String,
    },

    /// Delete an element with its counters and records.
    /// Returns: `Output::Deleted`
    ElementDelete { platform: String, element: String },

    /// List the elements of a platform.
    /// Returns: `Output::Elements`
    ElementList { platform: String },

    // ==================== Counter (4) ====================
    /// Define a counter; existing records get a zero value for it.
    /// Returns: `Output::CounterCreated`
    CounterCreate {
        platform: String,
        element: String,
        name: String,
        max_value: i64,
    },

    /// Rename a counter and/or change its ceiling.
    /// Returns: `Output::Counter`
    CounterUpdate {
        platform: String,
        element: String,
        counter: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_value: Option<i64>,
    },

    /// Delete a counter and its values.
    /// Returns: `Output::Deleted`
    CounterDelete {
        platform: String,
        element: String,
        counter: String,
    },

    /// List the counters of an element.
    /// Returns: `Output::Counters`
    CounterList { platform: String, element: String },

    // ==================== Record (6) ====================
    /// Create a record with every counter at 0.
    /// Returns: `Output::RecordCreated`
    RecordCreate {
        platform: String,
        element: String,
        record: JsonValue,
    },

    /// List every record of an element.
    /// Returns: `Output::Records`
    RecordList { platform: String, element: String },

    /// Read one record.
    /// Returns: `Output::Record`
    RecordGet {
        platform: String,
        element: String,
        record: JsonValue,
    },

    /// Delete one record.
    /// Returns: `Output::Deleted`
    RecordDelete {
        platform: String,
        element: String,
        record: JsonValue,
    },

    /// Read one counter value.
    /// Returns: `Output::Value`
    ValueGet {
        platform: String,
        element: String,
        record: JsonValue,
        counter: String,
    },

    /// Bounded increment of one counter value.
    /// Returns: `Output::Value`
    Increment {
        platform: String,
        element: String,
        record: JsonValue,
        counter: String,
        delta: JsonValue,
    },

    // ==================== Migration (4) ====================
    /// List migration jobs.
    /// Returns: `Output::Jobs`
    MigrationList,

    /// Read one migration job.
    /// Returns: `Output::Job`
    MigrationGet { job_id: u64 },

    /// Resume an incomplete migration job.
    /// Returns: `Output::Job`
    MigrationResume { job_id: u64 },

    /// Stop every running migration job between records. Stopped jobs
    /// become incomplete and can be resumed; later jobs are unaffected.
    /// Returns: `Output::Unit`
    MigrationCancel,
}

impl Command {
    /// Variant name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "Ping",
            Command::Health => "Health",
            Command::PlatformCreate { .. } => "PlatformCreate",
            Command::PlatformRename { .. } => "PlatformRename",
            Command::PlatformDelete { .. } => "PlatformDelete",
            Command::PlatformList => "PlatformList",
            Command::ElementCreate { .. } => "ElementCreate",
            Command::ElementRename { .. } => "ElementRename",
            Command::ElementDelete { .. } => "ElementDelete",
            Command::ElementList { .. } => "ElementList",
            Command::CounterCreate { .. } => "CounterCreate",
            Command::CounterUpdate { .. } => "CounterUpdate",
            Command::CounterDelete { .. } => "CounterDelete",
            Command::CounterList { .. } => "CounterList",
            Command::RecordCreate { .. } => "RecordCreate",
            Command::RecordList { .. } => "RecordList",
            Command::RecordGet { .. } => "RecordGet",
            Command::RecordDelete { .. } => "RecordDelete",
            Command::ValueGet { .. } => "ValueGet",
            Command::Increment { .. } => "Increment",
            Command::MigrationList => "MigrationList",
            Command::MigrationGet { .. } => "MigrationGet",
            Command::MigrationResume { .. } => "MigrationResume",
            Command::MigrationCancel => "MigrationCancel",
        }
    }
}
