//! Concurrent increments and record creation against one service.

#[path = "../common/mod.rs"]
mod common;

mod bounded;
mod creation;
