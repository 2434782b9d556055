//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

pub use ceiling_core::{CeilingError, RecordId, SetAddress, Slug};
pub use ceiling_engine::{
    CeilingConfig, CounterService, IncrementMode, JobState, MigrationConfig, MigrationKind,
};
pub use ceiling_executor::{Command, Executor, Response};

// ============================================================================
// Configs
// ============================================================================

/// Default config with the given increment mode.
pub fn config_with_mode(mode: IncrementMode) -> CeilingConfig {
    CeilingConfig {
        increment_mode: mode,
        ..CeilingConfig::default()
    }
}

/// Default config whose migration runs pause after `budget` records.
pub fn budgeted_config(budget: u64) -> CeilingConfig {
    CeilingConfig {
        migration: MigrationConfig {
            max_records_per_run: Some(budget),
        },
        ..CeilingConfig::default()
    }
}

// ============================================================================
// Addressing
// ============================================================================

pub fn slug(s: &str) -> Slug {
    Slug::new(s).expect("valid slug")
}

pub fn addr(platform: &str, element: &str) -> SetAddress {
    SetAddress::new(slug(platform), slug(element))
}

// ============================================================================
// Fixtures
// ============================================================================

/// Service seeded with platform "Google", element "Account" and a
/// "Requests" counter with the given ceiling.
pub fn seeded_service(config: CeilingConfig, max_value: i64) -> Arc<CounterService> {
    let service = CounterService::open(config).expect("open service");
    service.create_platform("Google").expect("create platform");
    service
        .create_element(&slug("google"), "Account")
        .expect("create element");
    service
        .create_counter(&addr("google", "account"), "Requests", max_value)
        .expect("create counter");
    Arc::new(service)
}

/// Create records `ids` under google/account.
pub fn seed_records(service: &CounterService, ids: impl IntoIterator<Item = i64>) {
    let account = addr("google", "account");
    for id in ids {
        service
            .create_record(&account, RecordId(id))
            .expect("create record");
    }
}

/// Executor over a fresh default service.
pub fn executor() -> Executor {
    Executor::open(CeilingConfig::default()).expect("open executor")
}

/// Run a JSON command line and return the response.
pub fn send(executor: &Executor, line: serde_json::Value) -> Response {
    executor.respond_json(&line.to_string())
}
