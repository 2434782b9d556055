//! Stored record model and its read views
//!
//! A record keeps its identity in a dedicated field and its counter values in
//! a map keyed by `CounterId`. Nothing else lives in the value map, so a
//! counter can never collide with the identity field.

use crate::catalog::CounterDef;
use crate::types::{CounterId, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One record as held by the value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Caller-supplied identity
    pub id: RecordId,
    /// Current value per counter
    pub values: BTreeMap<CounterId, i64>,
}

impl Record {
    /// Record with every listed counter at 0
    pub fn zeroed<'a>(id: RecordId, counters: impl IntoIterator<Item = &'a CounterDef>) -> Self {
        Self {
            id,
            values: counters.into_iter().map(|c| (c.id, 0)).collect(),
        }
    }

    /// Current value of a counter, if the record carries it
    pub fn value(&self, counter: CounterId) -> Option<i64> {
        self.values.get(&counter).copied()
    }

    /// Join values with catalog metadata
    ///
    /// Values for counters missing from `counters` are skipped; counters
    /// missing from the record are omitted too.
    pub fn view<'a>(&self, counters: impl IntoIterator<Item = &'a CounterDef>) -> RecordView {
        let readings = counters
            .into_iter()
            .filter_map(|c| {
                self.value(c.id).map(|value| {
                    (
                        c.slug.to_string(),
                        Reading {
                            value,
                            max: c.max_value,
                        },
                    )
                })
            })
            .collect();
        RecordView {
            id: self.id,
            counters: readings,
        }
    }
}

/// A value paired with its ceiling, displayed `value/max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Current value
    pub value: i64,
    /// Ceiling
    pub max: i64,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.max)
    }
}

/// Catalog-joined view of a record, keyed by counter slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordView {
    /// Record identity
    pub id: RecordId,
    /// Reading per counter slug
    pub counters: BTreeMap<String, Reading>,
}

impl RecordView {
    /// `value/max` strings per counter slug
    pub fn display_map(&self) -> BTreeMap<String, String> {
        self.counters
            .iter()
            .map(|(slug, reading)| (slug.clone(), reading.to_string()))
            .collect()
    }
}
