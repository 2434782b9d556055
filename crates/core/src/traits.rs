//! Core traits for value-store and catalog abstraction
//!
//! This module defines the `ValueStore`, `Catalog` and `RecordVisitor` traits
//! that let the engine run against any backend without knowing how records
//! or catalog rows are persisted.
//!
//! Thread safety: all store and catalog methods must be safe to call
//! concurrently from multiple threads (requires Send + Sync).

use crate::catalog::{CounterDef, Element, Platform};
use crate::error::CeilingResult;
use crate::record::Record;
use crate::slug::Slug;
use crate::types::{CounterId, ElementId, PlatformId, RecordId, RecordKey, SetAddress};

/// What a visitor wants the scan to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    /// Visit the next record
    Continue,
    /// End the scan after this record
    Stop,
}

/// Per-record callback driven by `ValueStore::scan`
///
/// Any state accumulated across records lives in the visitor itself, so the
/// caller can inspect it after the scan returns.
pub trait RecordVisitor {
    /// Visit one record
    ///
    /// An error aborts the scan and is returned from `scan` unchanged.
    fn visit(&mut self, key: &RecordKey, record: &Record) -> CeilingResult<ScanControl>;
}

/// Outcome of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Records handed to the visitor
    pub visited: u64,
    /// Id of the last record handed to the visitor
    pub last: Option<RecordId>,
    /// True if the visitor asked to stop before the end of the set
    pub stopped: bool,
}

/// Counter value store
///
/// Addressable by (namespace, set, key). The namespace is fixed when the
/// handle is connected; sets are `SetAddress`es and keys are `RecordId`s.
///
/// Single-record operations are atomic. Scans are single-pass traversals in
/// ascending record-id order with no isolation from concurrent writers: a
/// record present when the scan starts is visited unless it is removed
/// first; records written during the scan may or may not be visited.
pub trait ValueStore: Send + Sync {
    /// Namespace this handle is bound to
    fn namespace(&self) -> &str;

    /// Fails once the handle has been shut down
    fn health_check(&self) -> CeilingResult<()>;

    /// Release the handle; every later call fails with `Storage`
    fn shutdown(&self);

    /// Does a record exist at `key`?
    fn exists(&self, key: &RecordKey) -> CeilingResult<bool>;

    /// Fetch a copy of the record at `key`
    fn get(&self, key: &RecordKey) -> CeilingResult<Option<Record>>;

    /// Write a record, replacing any existing one
    fn put(&self, key: &RecordKey, record: Record) -> CeilingResult<()>;

    /// Write a record only if none exists at `key`
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a record is present; nothing is written.
    fn insert_new(&self, key: &RecordKey, record: Record) -> CeilingResult<()>;

    /// Remove a record; returns whether one existed
    fn remove(&self, key: &RecordKey) -> CeilingResult<bool>;

    /// Remove one counter value from a record; returns whether it existed
    fn remove_bin(&self, key: &RecordKey, counter: CounterId) -> CeilingResult<bool>;

    /// Set a counter value only if the record lacks it; returns whether it was set
    ///
    /// Missing records are left alone and report `false`.
    fn insert_bin_if_absent(
        &self,
        key: &RecordKey,
        counter: CounterId,
        value: i64,
    ) -> CeilingResult<bool>;

    /// Atomically add `delta` to an existing counter value
    ///
    /// Returns the value after the add.
    ///
    /// # Errors
    ///
    /// `NotFound` if the record or the counter value is absent.
    fn increment(&self, key: &RecordKey, counter: CounterId, delta: i64) -> CeilingResult<i64>;

    /// Atomically add `delta` only if the result stays within `max`
    ///
    /// The ceiling check and the add happen under the same lock.
    ///
    /// # Errors
    ///
    /// `NotFound` as for `increment`; `CapacityExceeded` with nothing written
    /// if the add would pass `max`.
    fn increment_bounded(
        &self,
        key: &RecordKey,
        counter: CounterId,
        delta: i64,
        max: i64,
    ) -> CeilingResult<i64>;

    /// Visit every record of a set with id strictly greater than `after`
    fn scan(
        &self,
        address: &SetAddress,
        after: Option<RecordId>,
        visitor: &mut dyn RecordVisitor,
    ) -> CeilingResult<ScanSummary>;

    /// Remove every record of a set; returns how many were removed
    fn truncate(&self, address: &SetAddress) -> CeilingResult<usize>;

    /// Every set address currently holding at least one record
    fn addresses(&self) -> CeilingResult<Vec<SetAddress>>;

    /// Number of records in a set
    fn record_count(&self, address: &SetAddress) -> CeilingResult<usize>;
}

/// Catalog store
///
/// Lookups by slug and id plus the row mutations the CRUD layer performs.
/// Uniqueness and slug validation happen above this trait.
pub trait Catalog: Send + Sync {
    /// Platform by slug
    fn platform(&self, slug: &Slug) -> CeilingResult<Option<Platform>>;

    /// Platform by id
    fn platform_by_id(&self, id: PlatformId) -> CeilingResult<Option<Platform>>;

    /// Every platform, ordered by id
    fn platforms(&self) -> CeilingResult<Vec<Platform>>;

    /// Element by its set address
    fn element(&self, address: &SetAddress) -> CeilingResult<Option<Element>>;

    /// Every element of a platform, ordered by id
    fn elements_of(&self, platform: PlatformId) -> CeilingResult<Vec<Element>>;

    /// Counter by slug within an element
    fn counter(&self, element: ElementId, slug: &Slug) -> CeilingResult<Option<CounterDef>>;

    /// Counter by id
    fn counter_by_id(&self, id: CounterId) -> CeilingResult<Option<CounterDef>>;

    /// Every counter of an element, ordered by id
    fn counters_of(&self, element: ElementId) -> CeilingResult<Vec<CounterDef>>;

    /// Insert a platform row
    fn insert_platform(&self, name: &str, slug: Slug) -> CeilingResult<Platform>;

    /// Insert an element row
    fn insert_element(&self, platform: PlatformId, name: &str, slug: Slug)
        -> CeilingResult<Element>;

    /// Insert a counter row
    fn insert_counter(
        &self,
        element: ElementId,
        name: &str,
        slug: Slug,
        max_value: i64,
    ) -> CeilingResult<CounterDef>;

    /// Rename a platform row
    fn rename_platform(&self, id: PlatformId, name: &str, slug: Slug) -> CeilingResult<Platform>;

    /// Rename an element row
    fn rename_element(&self, id: ElementId, name: &str, slug: Slug) -> CeilingResult<Element>;

    /// Rename a counter row
    fn rename_counter(&self, id: CounterId, name: &str, slug: Slug) -> CeilingResult<CounterDef>;

    /// Commit a new ceiling
    fn set_max_value(&self, id: CounterId, max_value: i64) -> CeilingResult<CounterDef>;

    /// Remove a platform row with its elements and counters
    fn remove_platform(&self, id: PlatformId) -> CeilingResult<bool>;

    /// Remove an element row with its counters
    fn remove_element(&self, id: ElementId) -> CeilingResult<bool>;

    /// Remove a counter row
    fn remove_counter(&self, id: CounterId) -> CeilingResult<bool>;
}
