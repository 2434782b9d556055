//! Boundary types: status codes, responses and argument parsing.
//!
//! Record ids and deltas arrive as raw JSON values so the executor can
//! accept both numbers and numeric strings, and reject everything else
//! with a validation error before anything is touched.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use ceiling_core::{RecordId, SetAddress, Slug};

use crate::{Error, Result};

/// Boundary status codes
pub mod status {
    /// Success
    pub const OK: u16 = 200;
    /// Created
    pub const CREATED: u16 = 201;
    /// Deleted
    pub const NO_CONTENT: u16 = 204;
    /// Validation failure
    pub const BAD_REQUEST: u16 = 400;
    /// Set address held by another migration
    pub const CONFLICT: u16 = 409;
    /// Increment would pass the ceiling
    pub const CAPACITY_EXCEEDED: u16 = 440;
    /// Missing catalog row, record or value
    pub const NOT_FOUND: u16 = 441;
    /// Duplicate record
    pub const ALREADY_EXISTS: u16 = 442;
    /// Store failure or incomplete migration
    pub const INTERNAL: u16 = 500;
}

/// Status code plus JSON body for one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Boundary status code
    pub status: u16,
    /// Output on success, `{"error": ..., "message": ...}` on failure,
    /// `null` for 204
    pub body: JsonValue,
}

impl Response {
    /// Response for a failed command
    pub fn from_error(err: &Error) -> Self {
        let detail = serde_json::to_value(err).unwrap_or(JsonValue::Null);
        Self {
            status: err.status_code(),
            body: serde_json::json!({
                "error": detail,
                "message": err.to_string(),
            }),
        }
    }

    /// Is this a 2xx response?
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn parse_integer(value: &JsonValue, what: &str) -> Result<i64> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| Error::InvalidInput {
        reason: format!("{} must be an integer, got {}", what, value),
    })
}

/// Record id from a JSON number or numeric string
pub fn parse_record_id(value: &JsonValue) -> Result<RecordId> {
    parse_integer(value, "record id").map(RecordId)
}

/// Increment delta from a JSON number or numeric string; must be >= 0
pub fn parse_delta(value: &JsonValue) -> Result<i64> {
    let delta = parse_integer(value, "delta")?;
    if delta < 0 {
        return Err(Error::InvalidInput {
            reason: "delta must be a non-negative integer".to_string(),
        });
    }
    Ok(delta)
}

/// Slug naming an existing catalog row
///
/// Text that cannot be a slug cannot name a row, so it is reported as
/// not found rather than invalid.
pub fn lookup_slug(kind: &str, text: &str) -> Result<Slug> {
    Slug::new(text).map_err(|_| Error::NotFound {
        entity: format!("{} {}", kind, text),
    })
}

/// Set address from platform and element slugs
pub fn lookup_address(platform: &str, element: &str) -> Result<SetAddress> {
    Ok(SetAddress::new(
        lookup_slug("platform", platform)?,
        lookup_slug("element", element)?,
    ))
}
