//! Record Lifecycle Manager
//!
//! Creates records with a zero value for every counter their element
//! defines, and reads them back joined with catalog ceilings.

use crate::resolve;
use ceiling_core::{
    Catalog, CeilingError, CeilingResult, CounterDef, Record, RecordId, RecordKey, RecordView,
    RecordVisitor, ScanControl, SetAddress, ValueStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Scan visitor accumulating catalog-joined views
///
/// Values for counters missing from `counters` are skipped.
pub struct RecordCollector<'a> {
    counters: &'a [CounterDef],
    views: Vec<RecordView>,
}

impl<'a> RecordCollector<'a> {
    /// Collector joining against `counters`
    pub fn new(counters: &'a [CounterDef]) -> Self {
        Self {
            counters,
            views: Vec::new(),
        }
    }

    /// Views collected so far, in scan order
    pub fn into_views(self) -> Vec<RecordView> {
        self.views
    }
}

impl RecordVisitor for RecordCollector<'_> {
    fn visit(&mut self, _key: &RecordKey, record: &Record) -> CeilingResult<ScanControl> {
        self.views.push(record.view(self.counters));
        Ok(ScanControl::Continue)
    }
}

/// Creates, reads and deletes single records
pub struct RecordManager {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn ValueStore>,
}

impl RecordManager {
    /// Manager over a catalog and a value store
    pub fn new(catalog: Arc<dyn Catalog>, store: Arc<dyn ValueStore>) -> Self {
        Self { catalog, store }
    }

    /// Create a record with every counter of its element at 0
    ///
    /// # Errors
    ///
    /// - `NotFound` if the element does not exist
    /// - `AlreadyExists` if the id is taken; the existing record is untouched
    pub fn create(&self, address: &SetAddress, id: RecordId) -> CeilingResult<RecordView> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let counters = self.catalog.counters_of(element.id)?;
        let key = address.key(id);

        let record = Record::zeroed(id, &counters);
        let view = record.view(&counters);
        self.store.insert_new(&key, record).map_err(|e| match e {
            CeilingError::AlreadyExists { .. } => {
                CeilingError::already_exists(format!("record {} in {}", id, address))
            }
            other => other,
        })?;

        info!(target: "ceiling::record", key = %key, counters = counters.len(), "Record created");
        Ok(view)
    }

    /// Every record of an element, ascending by id
    pub fn list(&self, address: &SetAddress) -> CeilingResult<Vec<RecordView>> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let counters = self.catalog.counters_of(element.id)?;

        let mut collector = RecordCollector::new(&counters);
        let summary = self.store.scan(address, None, &mut collector)?;
        debug!(target: "ceiling::record", address = %address, visited = summary.visited, "Records listed");
        Ok(collector.into_views())
    }

    /// One record joined with its ceilings
    pub fn get(&self, address: &SetAddress, id: RecordId) -> CeilingResult<RecordView> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let counters = self.catalog.counters_of(element.id)?;
        let record = self
            .store
            .get(&address.key(id))?
            .ok_or_else(|| resolve::record_missing(address, id))?;
        Ok(record.view(&counters))
    }

    /// Remove one record
    pub fn delete(&self, address: &SetAddress, id: RecordId) -> CeilingResult<()> {
        resolve::element(self.catalog.as_ref(), address)?;
        let key = address.key(id);
        if !self.store.remove(&key)? {
            return Err(resolve::record_missing(address, id));
        }
        info!(target: "ceiling::record", key = %key, "Record deleted");
        Ok(())
    }
}
