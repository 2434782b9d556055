//! Sharded value store
//!
//! One shard per set address: DashMap keyed by `SetAddress`, FxHashMap of
//! records within.
//!
//! # Design
//!
//! - DashMap: 16-way sharded by default, lock-free reads
//! - FxHashMap: O(1) lookups, fast non-crypto hash
//! - Per-SetAddress: each element's population is its own shard, so
//!   different elements never contend
//!
//! # Atomicity
//!
//! Every single-record operation runs under the owning shard's write guard,
//! which makes `increment` and `increment_bounded` atomic with respect to
//! each other and to `put`/`remove` on the same set.
//!
//! Scans copy the id list under a read guard, release it, and then fetch
//! each record individually. The visitor therefore never runs while a shard
//! guard is held and is free to mutate the store it is scanning.

use ceiling_core::{
    CeilingError, CeilingResult, CounterId, Record, RecordId, RecordKey, RecordVisitor,
    ScanControl, ScanSummary, SetAddress, ValueStore,
};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Default namespace for new handles
pub const DEFAULT_NAMESPACE: &str = "limit_counter";

/// Records of one set address
#[derive(Debug, Default)]
pub struct Shard {
    /// Records keyed by id
    pub(crate) records: FxHashMap<RecordId, Record>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in this shard
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sharded in-memory value store
///
/// # Example
///
/// ```
/// use ceiling_core::ValueStore;
/// use ceiling_storage::ShardedStore;
///
/// let store = ShardedStore::connect("limit_counter");
/// assert!(store.health_check().is_ok());
/// store.shutdown();
/// assert!(store.health_check().is_err());
/// ```
pub struct ShardedStore {
    namespace: String,
    shards: DashMap<SetAddress, Shard>,
    closed: AtomicBool,
}

impl ShardedStore {
    /// Open a handle bound to `namespace`
    pub fn connect(namespace: impl Into<String>) -> Arc<Self> {
        let namespace = namespace.into();
        info!(target: "ceiling::store", namespace = %namespace, "Value store connected");
        Arc::new(Self {
            namespace,
            shards: DashMap::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Number of non-empty shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Total records across all shards
    pub fn total_records(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    fn ensure_open(&self) -> CeilingResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CeilingError::storage(format!(
                "value store '{}' is shut down",
                self.namespace
            )));
        }
        Ok(())
    }

    /// Drop the shard if its last record went away
    fn reap(&self, address: &SetAddress) {
        self.shards.remove_if(address, |_, shard| shard.is_empty());
    }

    /// Run `f` against one record under its shard's write guard
    fn with_record<T>(
        &self,
        key: &RecordKey,
        f: impl FnOnce(&mut Record) -> CeilingResult<T>,
    ) -> CeilingResult<T> {
        self.ensure_open()?;
        let mut shard = self
            .shards
            .get_mut(&key.address)
            .ok_or_else(|| CeilingError::not_found(format!("record {}", key)))?;
        let record = shard
            .records
            .get_mut(&key.id)
            .ok_or_else(|| CeilingError::not_found(format!("record {}", key)))?;
        f(record)
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("namespace", &self.namespace)
            .field("shard_count", &self.shard_count())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

impl ValueStore for ShardedStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn health_check(&self) -> CeilingResult<()> {
        self.ensure_open()
    }

    fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!(target: "ceiling::store", namespace = %self.namespace, "Value store shut down");
        }
    }

    fn exists(&self, key: &RecordKey) -> CeilingResult<bool> {
        self.ensure_open()?;
        Ok(self
            .shards
            .get(&key.address)
            .map(|shard| shard.records.contains_key(&key.id))
            .unwrap_or(false))
    }

    fn get(&self, key: &RecordKey) -> CeilingResult<Option<Record>> {
        self.ensure_open()?;
        Ok(self
            .shards
            .get(&key.address)
            .and_then(|shard| shard.records.get(&key.id).cloned()))
    }

    fn put(&self, key: &RecordKey, record: Record) -> CeilingResult<()> {
        self.ensure_open()?;
        let mut shard = self.shards.entry(key.address.clone()).or_default();
        shard.records.insert(key.id, record);
        Ok(())
    }

    fn insert_new(&self, key: &RecordKey, record: Record) -> CeilingResult<()> {
        self.ensure_open()?;
        let mut shard = self.shards.entry(key.address.clone()).or_default();
        if shard.records.contains_key(&key.id) {
            return Err(CeilingError::already_exists(format!("record {}", key)));
        }
        shard.records.insert(key.id, record);
        Ok(())
    }

    fn remove(&self, key: &RecordKey) -> CeilingResult<bool> {
        self.ensure_open()?;
        let removed = self
            .shards
            .get_mut(&key.address)
            .map(|mut shard| shard.records.remove(&key.id).is_some())
            .unwrap_or(false);
        if removed {
            self.reap(&key.address);
        }
        Ok(removed)
    }

    fn remove_bin(&self, key: &RecordKey, counter: CounterId) -> CeilingResult<bool> {
        self.ensure_open()?;
        Ok(self
            .shards
            .get_mut(&key.address)
            .and_then(|mut shard| {
                shard
                    .records
                    .get_mut(&key.id)
                    .map(|record| record.values.remove(&counter).is_some())
            })
            .unwrap_or(false))
    }

    fn insert_bin_if_absent(
        &self,
        key: &RecordKey,
        counter: CounterId,
        value: i64,
    ) -> CeilingResult<bool> {
        self.ensure_open()?;
        Ok(self
            .shards
            .get_mut(&key.address)
            .and_then(|mut shard| {
                shard.records.get_mut(&key.id).map(|record| {
                    if record.values.contains_key(&counter) {
                        false
                    } else {
                        record.values.insert(counter, value);
                        true
                    }
                })
            })
            .unwrap_or(false))
    }

    fn increment(&self, key: &RecordKey, counter: CounterId, delta: i64) -> CeilingResult<i64> {
        self.with_record(key, |record| {
            let slot = record.values.get_mut(&counter).ok_or_else(|| {
                CeilingError::not_found(format!("counter {} on record {}", counter, key))
            })?;
            *slot = slot.checked_add(delta).ok_or_else(|| {
                CeilingError::invalid_input(format!("increment overflows counter {}", counter))
            })?;
            Ok(*slot)
        })
    }

    fn increment_bounded(
        &self,
        key: &RecordKey,
        counter: CounterId,
        delta: i64,
        max: i64,
    ) -> CeilingResult<i64> {
        self.with_record(key, |record| {
            let slot = record.values.get_mut(&counter).ok_or_else(|| {
                CeilingError::not_found(format!("counter {} on record {}", counter, key))
            })?;
            match slot.checked_add(delta) {
                Some(next) if next <= max => {
                    *slot = next;
                    Ok(next)
                }
                _ => Err(CeilingError::CapacityExceeded {
                    counter: counter.to_string(),
                    current: *slot,
                    requested: delta,
                    max,
                }),
            }
        })
    }

    fn scan(
        &self,
        address: &SetAddress,
        after: Option<RecordId>,
        visitor: &mut dyn RecordVisitor,
    ) -> CeilingResult<ScanSummary> {
        self.ensure_open()?;
        let mut ids: Vec<RecordId> = match self.shards.get(address) {
            Some(shard) => shard
                .records
                .keys()
                .copied()
                .filter(|id| after.map_or(true, |cursor| *id > cursor))
                .collect(),
            None => Vec::new(),
        };
        ids.sort_unstable();

        let mut summary = ScanSummary::default();
        for id in ids {
            let key = address.key(id);
            // Removed since the id list was taken
            let Some(record) = self.get(&key)? else {
                continue;
            };
            let control = visitor.visit(&key, &record)?;
            summary.visited += 1;
            summary.last = Some(id);
            if control == ScanControl::Stop {
                summary.stopped = true;
                break;
            }
        }
        Ok(summary)
    }

    fn truncate(&self, address: &SetAddress) -> CeilingResult<usize> {
        self.ensure_open()?;
        let removed = self
            .shards
            .remove(address)
            .map(|(_, shard)| shard.len())
            .unwrap_or(0);
        debug!(target: "ceiling::store", address = %address, removed, "Set truncated");
        Ok(removed)
    }

    fn addresses(&self) -> CeilingResult<Vec<SetAddress>> {
        self.ensure_open()?;
        let mut addresses: Vec<SetAddress> = self
            .shards
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        addresses.sort();
        Ok(addresses)
    }

    fn record_count(&self, address: &SetAddress) -> CeilingResult<usize> {
        self.ensure_open()?;
        Ok(self
            .shards
            .get(address)
            .map(|shard| shard.len())
            .unwrap_or(0))
    }
}
