//! Core types and traits for Ceiling
//!
//! This crate defines the foundational types used throughout the system:
//! - Slug: validated address component for catalog rows
//! - PlatformId / ElementId / CounterId / RecordId: identifiers
//! - SetAddress / RecordKey: where records live in the value store
//! - Platform / Element / CounterDef: catalog rows
//! - Record / RecordView: stored record and its catalog-joined view
//! - Limits: slug and ceiling limits
//! - Error: error type hierarchy
//! - Traits: ValueStore, Catalog, RecordVisitor

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod limits;
pub mod record;
pub mod slug;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use catalog::{CounterDef, Element, Platform};
pub use error::{CeilingError, CeilingResult};
pub use limits::{LimitError, Limits};
pub use record::{Reading, Record, RecordView};
pub use slug::{slugify, Slug, SlugError, SlugKind};
pub use traits::{Catalog, RecordVisitor, ScanControl, ScanSummary, ValueStore};
pub use types::{CounterId, ElementId, PlatformId, RecordId, RecordKey, SetAddress};

impl From<SlugError> for CeilingError {
    fn from(e: SlugError) -> Self {
        CeilingError::invalid_input(e.to_string())
    }
}

impl From<LimitError> for CeilingError {
    fn from(e: LimitError) -> Self {
        CeilingError::invalid_input(e.to_string())
    }
}
