//! Cooperative cancellation for long-running scans
//!
//! Migration jobs check their token before every record. A cancelled job
//! stops between records and keeps its cursor.

use ceiling_core::{CeilingError, CeilingResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a live (not cancelled) token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancellation has been requested
    pub fn check(&self) -> CeilingResult<()> {
        if self.is_cancelled() {
            Err(CeilingError::Cancelled)
        } else {
            Ok(())
        }
    }
}
