//! Bounded Increment Engine
//!
//! Reads and increments single counter values against their catalog
//! ceiling, and validates ceiling changes against every stored value.
//!
//! ## Increment modes
//!
//! `Checked` reads the value, compares `value + delta` with the ceiling and
//! then issues a plain atomic add. The read and the add are separate store
//! calls, so two concurrent increments on the same value can each pass their
//! check and jointly overshoot. `Atomic` hands the ceiling to the store,
//! which compares and adds under one record lock.

use crate::config::IncrementMode;
use crate::resolve;
use ceiling_core::{
    Catalog, CeilingError, CeilingResult, CounterDef, CounterId, Limits, Record, RecordId,
    RecordKey, RecordVisitor, ScanControl, SetAddress, Slug, ValueStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Scan visitor looking for the first value above a proposed ceiling
pub struct OverflowCheck {
    counter: CounterId,
    max: i64,
    offender: Option<(RecordId, i64)>,
}

impl OverflowCheck {
    /// Check `counter` values against `max`
    pub fn new(counter: CounterId, max: i64) -> Self {
        Self {
            counter,
            max,
            offender: None,
        }
    }

    /// First record found above the ceiling, with its value
    pub fn offender(&self) -> Option<(RecordId, i64)> {
        self.offender
    }
}

impl RecordVisitor for OverflowCheck {
    fn visit(&mut self, key: &RecordKey, record: &Record) -> CeilingResult<ScanControl> {
        match record.value(self.counter) {
            Some(value) if value > self.max => {
                self.offender = Some((key.id, value));
                Ok(ScanControl::Stop)
            }
            _ => Ok(ScanControl::Continue),
        }
    }
}

/// Single-value reads and bounded increments
pub struct IncrementEngine {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn ValueStore>,
    mode: IncrementMode,
    limits: Limits,
}

impl IncrementEngine {
    /// Engine over a catalog and a value store
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn ValueStore>,
        mode: IncrementMode,
        limits: Limits,
    ) -> Self {
        Self {
            catalog,
            store,
            mode,
            limits,
        }
    }

    /// Active increment mode
    pub fn mode(&self) -> IncrementMode {
        self.mode
    }

    fn lookup(&self, address: &SetAddress, counter: &Slug) -> CeilingResult<CounterDef> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        resolve::counter(self.catalog.as_ref(), address, &element, counter)
    }

    fn current(&self, key: &RecordKey, counter: &CounterDef) -> CeilingResult<i64> {
        let record = self
            .store
            .get(key)?
            .ok_or_else(|| resolve::record_missing(&key.address, key.id))?;
        record.value(counter.id).ok_or_else(|| {
            CeilingError::not_found(format!("value of counter {} for record {}", counter.slug, key))
        })
    }

    /// Current value of one counter on one record
    ///
    /// # Errors
    ///
    /// `NotFound` if the element, counter, record or stored value is absent.
    pub fn get(&self, address: &SetAddress, id: RecordId, counter: &Slug) -> CeilingResult<i64> {
        let def = self.lookup(address, counter)?;
        self.current(&address.key(id), &def)
    }

    /// Add `delta` to one counter value, refusing to pass its ceiling
    ///
    /// Returns the value after the add.
    ///
    /// # Errors
    ///
    /// - `Validation` for a negative delta
    /// - `NotFound` as for `get`
    /// - `CapacityExceeded` if the value would pass the ceiling; nothing is
    ///   written
    pub fn increment(
        &self,
        address: &SetAddress,
        id: RecordId,
        counter: &Slug,
        delta: i64,
    ) -> CeilingResult<i64> {
        if delta < 0 {
            return Err(CeilingError::invalid_input(
                "delta must be a non-negative integer",
            ));
        }
        let def = self.lookup(address, counter)?;
        let key = address.key(id);

        let result = match self.mode {
            IncrementMode::Checked => {
                let current = self.current(&key, &def)?;
                if def.admits(current, delta) {
                    self.store.increment(&key, def.id, delta)
                } else {
                    Err(CeilingError::CapacityExceeded {
                        counter: def.slug.to_string(),
                        current,
                        requested: delta,
                        max: def.max_value,
                    })
                }
            }
            IncrementMode::Atomic => self
                .store
                .increment_bounded(&key, def.id, delta, def.max_value),
        };

        match result {
            Ok(value) => {
                debug!(target: "ceiling::increment", key = %key, counter = %def.slug, delta, value, "Incremented");
                Ok(value)
            }
            Err(CeilingError::CapacityExceeded {
                current,
                requested,
                max,
                ..
            }) => {
                debug!(
                    target: "ceiling::increment",
                    key = %key,
                    counter = %def.slug,
                    current,
                    requested,
                    max,
                    "Increment rejected at ceiling"
                );
                Err(CeilingError::CapacityExceeded {
                    counter: def.slug.to_string(),
                    current,
                    requested,
                    max,
                })
            }
            Err(CeilingError::NotFound { .. }) => Err(CeilingError::not_found(format!(
                "value of counter {} for record {}",
                def.slug, key
            ))),
            Err(e) => Err(e),
        }
    }

    /// Validate a new ceiling against every stored value, then commit it
    ///
    /// The catalog is left untouched unless the whole scan passes. A value
    /// raised by a concurrent increment after the scan can still end up
    /// above the committed ceiling.
    ///
    /// # Errors
    ///
    /// `Validation` if `new_max < 1` or any record holds a larger value.
    pub fn change_ceiling(
        &self,
        address: &SetAddress,
        counter: &Slug,
        new_max: i64,
    ) -> CeilingResult<CounterDef> {
        self.limits.validate_max_value(new_max)?;
        let def = self.lookup(address, counter)?;
        if def.max_value == new_max {
            return Ok(def);
        }

        let mut check = OverflowCheck::new(def.id, new_max);
        self.store.scan(address, None, &mut check)?;
        if let Some((id, value)) = check.offender() {
            debug!(target: "ceiling::increment", address = %address, counter = %def.slug, record = %id, value, new_max, "Ceiling change rejected");
            return Err(CeilingError::invalid_input(format!(
                "cannot set max_value of {} to {}: record {} holds {}",
                def.slug, new_max, id, value
            )));
        }

        let updated = self.catalog.set_max_value(def.id, new_max)?;
        info!(
            target: "ceiling::catalog",
            address = %address,
            counter = %updated.slug,
            old_max = def.max_value,
            new_max,
            "Ceiling changed"
        );
        Ok(updated)
    }
}
