//! Ceiling: bounded per-record counters
//!
//! Counters are defined in a platform → element → counter catalog. Each
//! element holds records, and every record carries one value per counter of
//! its element. An increment is rejected when it would carry a value past
//! the counter's ceiling (`max_value`).
//!
//! # Quick Start
//!
//! ```ignore
//! use ceiling::{CeilingConfig, Command, Executor, Output};
//!
//! let executor = Executor::open(CeilingConfig::default())?;
//! executor.execute(Command::PlatformCreate { name: "Google".into() })?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which maps JSON commands to
//! the counter service and renders status-coded responses. Catalog changes
//! that move or rewrite records run as resumable migration jobs.

pub use ceiling_executor::*;
