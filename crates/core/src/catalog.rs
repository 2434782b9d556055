//! Catalog rows
//!
//! `Platform` 1—N `Element` 1—N `CounterDef`. Rows are owned by the catalog
//! store; the counter engine only reads them, except for the ceiling commit
//! after a successful validation scan.

use crate::slug::Slug;
use crate::types::{CounterId, ElementId, PlatformId};
use serde::{Deserialize, Serialize};

/// Group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Catalog id
    pub id: PlatformId,
    /// Display name
    pub name: String,
    /// Address component
    pub slug: Slug,
}

/// Sub-group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Catalog id
    pub id: ElementId,
    /// Display name
    pub name: String,
    /// Address component
    pub slug: Slug,
    /// Owning platform
    pub platform_id: PlatformId,
}

/// Counter definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterDef {
    /// Catalog id; record values are keyed by it
    pub id: CounterId,
    /// Display name
    pub name: String,
    /// Lookup slug
    pub slug: Slug,
    /// Ceiling, always >= 1
    pub max_value: i64,
    /// Owning element
    pub element_id: ElementId,
}

impl CounterDef {
    /// Would `current + delta` stay within the ceiling?
    ///
    /// Overflowing arithmetic counts as exceeding.
    pub fn admits(&self, current: i64, delta: i64) -> bool {
        match current.checked_add(delta) {
            Some(sum) => sum <= self.max_value,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(max_value: i64) -> CounterDef {
        CounterDef {
            id: CounterId(1),
            name: "Requests".to_string(),
            slug: Slug::new("requests").unwrap(),
            max_value,
            element_id: ElementId(1),
        }
    }

    #[test]
    fn test_admits_up_to_ceiling() {
        let c = counter(20);
        assert!(c.admits(0, 18));
        assert!(c.admits(18, 2));
        assert!(!c.admits(18, 5));
        assert!(c.admits(20, 0));
    }

    #[test]
    fn test_admits_overflow() {
        let c = counter(i64::MAX);
        assert!(!c.admits(i64::MAX, 1));
    }
}
