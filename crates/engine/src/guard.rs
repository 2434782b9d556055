//! Single-flight guard for catalog migrations
//!
//! Catalog mutations that scan or move records claim every set address they
//! touch before starting. A claim is all-or-nothing and never waits: if any
//! address is already held, the caller gets `MigrationInProgress` right away.
//!
//! Single-record operations (create, get, increment) never consult the guard.

use ceiling_core::{CeilingError, CeilingResult, SetAddress};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use tracing::debug;

/// Set of addresses currently claimed by running migrations
#[derive(Debug, Default)]
pub struct MigrationGuard {
    held: Mutex<BTreeSet<SetAddress>>,
}

impl MigrationGuard {
    /// Create a guard with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim every address in `addresses`
    ///
    /// Duplicates are collapsed. The claim is released when the returned
    /// `GuardClaim` is dropped.
    ///
    /// # Errors
    ///
    /// `MigrationInProgress` naming the first held address; nothing is
    /// claimed in that case.
    pub fn acquire(
        &self,
        addresses: impl IntoIterator<Item = SetAddress>,
    ) -> CeilingResult<GuardClaim<'_>> {
        let wanted: BTreeSet<SetAddress> = addresses.into_iter().collect();
        let mut held = self.held.lock();
        if let Some(busy) = wanted.iter().find(|a| held.contains(*a)) {
            debug!(target: "ceiling::migration", address = %busy, "Set address busy");
            return Err(CeilingError::MigrationInProgress {
                address: busy.to_string(),
            });
        }
        held.extend(wanted.iter().cloned());
        Ok(GuardClaim {
            guard: self,
            addresses: wanted,
        })
    }

    #[cfg(test)]
    fn is_held(&self, address: &SetAddress) -> bool {
        self.held.lock().contains(address)
    }
}

/// Addresses claimed through `MigrationGuard::acquire`
#[derive(Debug)]
pub struct GuardClaim<'a> {
    guard: &'a MigrationGuard,
    addresses: BTreeSet<SetAddress>,
}

impl Drop for GuardClaim<'_> {
    fn drop(&mut self) {
        let mut held = self.guard.held.lock();
        for address in &self.addresses {
            held.remove(address);
        }
    }
}
