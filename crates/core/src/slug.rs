//! Slugs for catalog entities
//!
//! Every platform, element and counter is addressed by a slug derived from its
//! display name. Slugs double as the components of a set address, so they are
//! restricted to a URL- and path-safe alphabet.
//!
//! ## Rules
//!
//! - Slugs are non-empty
//! - Only `a-z`, `0-9`, `-` and `_`
//! - No leading or trailing `-` / `_`
//! - Each catalog level reserves a few words used by the routing layer

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validated slug
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse an already-slugified string
    ///
    /// # Examples
    ///
    /// ```
    /// use ceiling_core::slug::Slug;
    ///
    /// assert!(Slug::new("ad-groups").is_ok());
    /// assert!(Slug::new("Ad Groups").is_err());
    /// assert!(Slug::new("").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, SlugError> {
        let s = s.into();
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
        {
            return Err(SlugError::InvalidChar(c));
        }
        if s.starts_with(['-', '_']) || s.ends_with(['-', '_']) {
            return Err(SlugError::BadEdge);
        }
        Ok(Slug(s))
    }

    /// Derive a slug from a display name
    ///
    /// Lowercases, drops characters outside `[a-z0-9_ -]`, collapses runs of
    /// spaces and dashes into a single dash, and trims dashes and underscores
    /// from both ends.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        Slug::new(slugify(name))
    }

    /// Borrow the slug text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Slug::new(s)
    }
}

impl TryFrom<&str> for Slug {
    type Error = SlugError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Slug::new(s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

/// Turn a display name into slug text (may be empty)
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    out.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Catalog level a slug belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugKind {
    /// Group
    Platform,
    /// Sub-group
    Element,
    /// Counter definition
    Counter,
}

impl SlugKind {
    /// Words the routing layer uses at this level
    pub fn reserved(&self) -> &'static [&'static str] {
        match self {
            SlugKind::Platform => &["platforms"],
            SlugKind::Element => &["elements"],
            SlugKind::Counter => &["counters", "records"],
        }
    }

    /// True if `slug` collides with a reserved word at this level
    pub fn is_reserved(&self, slug: &Slug) -> bool {
        self.reserved().contains(&slug.as_str())
    }
}

impl fmt::Display for SlugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugKind::Platform => write!(f, "platform"),
            SlugKind::Element => write!(f, "element"),
            SlugKind::Counter => write!(f, "counter"),
        }
    }
}

/// Slug validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    /// Slug is empty (or the name slugified to nothing)
    #[error("slug cannot be empty")]
    Empty,

    /// Slug contains a character outside `[a-z0-9_-]`
    #[error("slug cannot contain {0:?}")]
    InvalidChar(char),

    /// Slug starts or ends with `-` or `_`
    #[error("slug cannot start or end with '-' or '_'")]
    BadEdge,
}
