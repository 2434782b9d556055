//! Migration job model
//!
//! One job per catalog mutation. A job names the sets it walks, the
//! per-record step it applies, an optional catalog follow-up to run once
//! every set is done, and a cursor recording how far it got.

use ceiling_core::{CounterId, ElementId, PlatformId, RecordId, SetAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record population move from one set address to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// Old address
    pub from: SetAddress,
    /// New address
    pub to: SetAddress,
}

/// What a job does to each record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MigrationKind {
    /// Give every record of the set a zero value for a new counter
    AddCounter {
        /// Element set
        address: SetAddress,
        /// New counter
        counter: CounterId,
    },
    /// Drop a counter's value from every record of the set
    RemoveCounter {
        /// Element set
        address: SetAddress,
        /// Removed counter
        counter: CounterId,
    },
    /// Move whole populations after a rename
    ///
    /// Per record: write at the new address, then delete at the old one.
    /// After each set is walked, any residue at the old address is purged.
    Relocate {
        /// One entry per element set affected by the rename
        moves: Vec<Relocation>,
    },
    /// Truncate whole sets after a delete
    Purge {
        /// Sets to empty
        addresses: Vec<SetAddress>,
    },
}

impl MigrationKind {
    /// Sets the job walks, in order
    pub fn source_sets(&self) -> Vec<SetAddress> {
        match self {
            MigrationKind::AddCounter { address, .. }
            | MigrationKind::RemoveCounter { address, .. } => vec![address.clone()],
            MigrationKind::Relocate { moves } => moves.iter().map(|m| m.from.clone()).collect(),
            MigrationKind::Purge { addresses } => addresses.clone(),
        }
    }

    /// Every address the job reads or writes
    pub fn touched_sets(&self) -> Vec<SetAddress> {
        match self {
            MigrationKind::Relocate { moves } => moves
                .iter()
                .flat_map(|m| [m.from.clone(), m.to.clone()])
                .collect(),
            other => other.source_sets(),
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            MigrationKind::AddCounter { .. } => "add_counter",
            MigrationKind::RemoveCounter { .. } => "remove_counter",
            MigrationKind::Relocate { .. } => "relocate",
            MigrationKind::Purge { .. } => "purge",
        }
    }
}

/// Catalog change applied once every set of a job is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum FollowUp {
    /// Remove a counter row
    RemoveCounter(CounterId),
    /// Remove an element row (with its counters)
    RemoveElement(ElementId),
    /// Remove a platform row (with its elements and counters)
    RemovePlatform(PlatformId),
}

/// Lifecycle of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    /// Recorded, not started
    Pending,
    /// A run is in progress
    Running,
    /// Every set walked and the follow-up applied
    Completed,
    /// Stopped early; resumable from the cursor
    Incomplete {
        /// Why the last run stopped
        reason: String,
    },
}

impl JobState {
    /// Is the job finished?
    pub fn is_completed(&self) -> bool {
        matches!(self, JobState::Completed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Running => write!(f, "running"),
            JobState::Completed => write!(f, "completed"),
            JobState::Incomplete { reason } => write!(f, "incomplete ({})", reason),
        }
    }
}

/// Position of a job within its sets
///
/// `set` indexes `MigrationKind::source_sets`; `after` is the last record
/// fully processed in that set. Records are walked in ascending id order, so
/// resuming strictly after `after` never repeats or skips a record that was
/// present when the job started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobCursor {
    /// Index of the set being walked
    pub set: usize,
    /// Last record completed in that set
    pub after: Option<RecordId>,
}

/// A tracked migration job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationJob {
    /// Ledger id
    pub id: u64,
    /// Per-record step
    pub kind: MigrationKind,
    /// Catalog change to apply on completion
    pub follow_up: Option<FollowUp>,
    /// Lifecycle state
    pub state: JobState,
    /// Resume position
    pub cursor: JobCursor,
    /// Records processed across all runs
    pub processed: u64,
    /// Number of runs started
    pub attempts: u32,
    /// When the job was recorded
    pub created_at: DateTime<Utc>,
    /// When the job completed
    pub finished_at: Option<DateTime<Utc>>,
}

impl MigrationJob {
    /// New pending job
    pub fn new(id: u64, kind: MigrationKind, follow_up: Option<FollowUp>) -> Self {
        Self {
            id,
            kind,
            follow_up,
            state: JobState::Pending,
            cursor: JobCursor::default(),
            processed: 0,
            attempts: 0,
            created_at: Utc::now(),
            finished_at: None,
        }
    }
}
