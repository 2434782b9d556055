//! Catalog changes that move or rewrite stored records.

#[path = "../common/mod.rs"]
mod common;

mod counters;
mod interruption;
mod renames;
