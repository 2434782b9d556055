//! End-to-end scenarios through the JSON command boundary.

#[path = "../common/mod.rs"]
mod common;

mod catalog;
mod ceiling;
mod records;
