//! Size limits for catalog slugs and counter values
//!
//! These limits are enforced by the catalog CRUD layer before any catalog or
//! value-store mutation. Violations surface as `Validation` errors.

use crate::slug::{Slug, SlugKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size limits for catalog entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum platform slug length in bytes (default: 20)
    pub max_platform_slug: usize,

    /// Maximum element slug length in bytes (default: 30)
    pub max_element_slug: usize,

    /// Maximum counter slug length in bytes (default: 30)
    pub max_counter_slug: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_platform_slug: 20,
            max_element_slug: 30,
            max_counter_slug: 30,
        }
    }
}

impl Limits {
    /// Maximum slug length for a catalog level
    pub fn max_slug(&self, kind: SlugKind) -> usize {
        match kind {
            SlugKind::Platform => self.max_platform_slug,
            SlugKind::Element => self.max_element_slug,
            SlugKind::Counter => self.max_counter_slug,
        }
    }

    /// Validate a slug's length and reserved-word status for its level
    pub fn validate_slug(&self, kind: SlugKind, slug: &Slug) -> Result<(), LimitError> {
        if kind.is_reserved(slug) {
            return Err(LimitError::Reserved {
                kind,
                slug: slug.to_string(),
            });
        }
        let len = slug.as_str().len();
        let max = self.max_slug(kind);
        if len > max {
            return Err(LimitError::SlugTooLong {
                kind,
                actual: len,
                max,
            });
        }
        Ok(())
    }

    /// Validate a counter ceiling
    pub fn validate_max_value(&self, max_value: i64) -> Result<(), LimitError> {
        if max_value < 1 {
            return Err(LimitError::CeilingTooLow { actual: max_value });
        }
        Ok(())
    }
}

/// Limit violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitError {
    /// Slug exceeds the level's maximum length
    #[error("{kind} slug too long: {actual} bytes exceeds maximum {max}")]
    SlugTooLong {
        /// Catalog level
        kind: SlugKind,
        /// Actual length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Slug is a reserved routing word
    #[error("cannot add {kind} with reserved name '{slug}'")]
    Reserved {
        /// Catalog level
        kind: SlugKind,
        /// Offending slug
        slug: String,
    },

    /// Ceiling below 1
    #[error("max_value must be at least 1, got {actual}")]
    CeilingTooLow {
        /// Offending ceiling
        actual: i64,
    },
}
