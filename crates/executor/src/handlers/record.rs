//! Record command handlers.
//!
//! Record ids and deltas are parsed here, so malformed values fail with
//! `InvalidInput` before the service is called.

use serde_json::Value as JsonValue;

use ceiling_engine::CounterService;

use crate::convert::convert_result;
use crate::types::{lookup_address, lookup_slug, parse_delta, parse_record_id};
use crate::{Output, Result};

/// Handle RecordCreate command.
pub fn record_create(
    service: &CounterService,
    platform: String,
    element: String,
    record: JsonValue,
) -> Result<Output> {
    let id = parse_record_id(&record)?;
    let address = lookup_address(&platform, &element)?;
    let view = convert_result(service.create_record(&address, id))?;
    Ok(Output::RecordCreated(view))
}

/// Handle RecordList command.
pub fn record_list(service: &CounterService, platform: String, element: String) -> Result<Output> {
    let address = lookup_address(&platform, &element)?;
    Ok(Output::Records(convert_result(service.list_records(&address))?))
}

/// Handle RecordGet command.
pub fn record_get(
    service: &CounterService,
    platform: String,
    element: String,
    record: JsonValue,
) -> Result<Output> {
    let id = parse_record_id(&record)?;
    let address = lookup_address(&platform, &element)?;
    Ok(Output::Record(convert_result(service.get_record(&address, id))?))
}

/// Handle RecordDelete command.
pub fn record_delete(
    service: &CounterService,
    platform: String,
    element: String,
    record: JsonValue,
) -> Result<Output> {
    let id = parse_record_id(&record)?;
    let address = lookup_address(&platform, &element)?;
    convert_result(service.delete_record(&address, id))?;
    Ok(Output::Deleted)
}

/// Handle ValueGet command.
pub fn value_get(
    service: &CounterService,
    platform: String,
    element: String,
    record: JsonValue,
    counter: String,
) -> Result<Output> {
    let id = parse_record_id(&record)?;
    let address = lookup_address(&platform, &element)?;
    let counter = lookup_slug("counter", &counter)?;
    Ok(Output::Value(convert_result(
        service.get_value(&address, id, &counter),
    )?))
}

/// Handle Increment command.
///
/// The delta is validated before any lookup, so a bad delta is a 400 even
/// when the record does not exist.
pub fn increment(
    service: &CounterService,
    platform: String,
    element: String,
    record: JsonValue,
    counter: String,
    delta: JsonValue,
) -> Result<Output> {
    let delta = parse_delta(&delta)?;
    let id = parse_record_id(&record)?;
    let address = lookup_address(&platform, &element)?;
    let counter = lookup_slug("counter", &counter)?;
    Ok(Output::Value(convert_result(
        service.increment(&address, id, &counter, delta),
    )?))
}
