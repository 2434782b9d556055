//! Storage backends for Ceiling
//!
//! This crate implements the reference backends behind the core traits:
//! - ShardedStore: DashMap + FxHashMap value store, one shard per set address
//! - MemoryCatalog: RwLock-guarded catalog rows
//!
//! Both are explicit handles. Callers construct them, hand `Arc`s to the
//! engine, and shut them down; nothing here is global.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod sharded;

pub use catalog::MemoryCatalog;
pub use sharded::{Shard, ShardedStore, DEFAULT_NAMESPACE};
