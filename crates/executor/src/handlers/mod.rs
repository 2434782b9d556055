//! Command handlers organized by area.
//!
//! | Module | Commands | Service area |
//! |--------|----------|--------------|
//! | `catalog` | 12 | Platforms, elements, counter definitions |
//! | `record` | 6 | Record lifecycle and bounded increments |
//! | `migration` | 4 | Migration job ledger and cancellation |

pub mod catalog;
pub mod migration;
pub mod record;
