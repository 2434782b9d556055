//! Core types for the counter system
//!
//! This module defines the foundational identifiers:
//! - PlatformId / ElementId / CounterId: catalog row ids
//! - RecordId: caller-supplied record identity
//! - SetAddress: (platform, element) location of a record population
//! - RecordKey: SetAddress + RecordId, the point address of one record

use crate::slug::Slug;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw id value
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Catalog id of a platform (group)
    PlatformId
);
row_id!(
    /// Catalog id of an element (sub-group)
    ElementId
);
row_id!(
    /// Catalog id of a counter definition
    ///
    /// Record values are keyed by this id, never by slug, so renaming a
    /// counter does not touch stored records.
    CounterId
);

/// Caller-supplied record identity, unique within its set address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Raw id value
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical location of an element's record population
///
/// `(platform, element)` uniquely addresses every record of an element.
/// After a completed rename or delete, nothing remains at the old address.
///
/// Format: "platform/element"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SetAddress {
    /// Platform slug
    pub platform: Slug,
    /// Element slug
    pub element: Slug,
}

impl SetAddress {
    /// Create a new set address
    pub fn new(platform: Slug, element: Slug) -> Self {
        Self { platform, element }
    }

    /// Same address with the platform component replaced
    pub fn with_platform(&self, platform: Slug) -> Self {
        Self {
            platform,
            element: self.element.clone(),
        }
    }

    /// Same address with the element component replaced
    pub fn with_element(&self, element: Slug) -> Self {
        Self {
            platform: self.platform.clone(),
            element,
        }
    }

    /// Point address of a record in this set
    pub fn key(&self, id: RecordId) -> RecordKey {
        RecordKey {
            address: self.clone(),
            id,
        }
    }
}

impl fmt::Display for SetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.element)
    }
}

/// Point address of a single record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Set the record lives in
    pub address: SetAddress,
    /// Record identity
    pub id: RecordId,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(p: &str, e: &str) -> SetAddress {
        SetAddress::new(Slug::new(p).unwrap(), Slug::new(e).unwrap())
    }

    #[test]
    fn test_set_address_display() {
        assert_eq!(addr("google", "account").to_string(), "google/account");
    }

    #[test]
    fn test_record_key_display() {
        let key = addr("google", "account").key(RecordId(42));
        assert_eq!(key.to_string(), "google/account/42");
    }

    #[test]
    fn test_with_element_keeps_platform() {
        let old = addr("google", "account");
        let new = old.with_element(Slug::new("accounts").unwrap());
        assert_eq!(new, addr("google", "accounts"));
        assert_ne!(old, new);
    }

    #[test]
    fn test_with_platform_keeps_element() {
        let new = addr("google", "account").with_platform(Slug::new("alphabet").unwrap());
        assert_eq!(new, addr("alphabet", "account"));
    }

    #[test]
    fn test_record_id_ordering() {
        let mut ids = vec![RecordId(5), RecordId(-3), RecordId(0)];
        ids.sort();
        assert_eq!(ids, vec![RecordId(-3), RecordId(0), RecordId(5)]);
    }

    #[test]
    fn test_ids_serialize_transparent() {
        assert_eq!(serde_json::to_string(&CounterId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&RecordId(-1)).unwrap(), "-1");
    }
}
