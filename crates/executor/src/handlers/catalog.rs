//! Catalog command handlers.
//!
//! Platform, element and counter definition CRUD. Renames, deletes and
//! counter changes run their migration before returning.

use ceiling_engine::CounterService;

use crate::convert::convert_result;
use crate::types::{lookup_address, lookup_slug};
use crate::{Output, Result};

// =============================================================================
// Platforms
// =============================================================================

/// Handle PlatformCreate command.
pub fn platform_create(service: &CounterService, name: String) -> Result<Output> {
    let platform = convert_result(service.create_platform(&name))?;
    Ok(Output::PlatformCreated(platform))
}

/// Handle PlatformRename command.
pub fn platform_rename(service: &CounterService, platform: String, name: String) -> Result<Output> {
    let slug = lookup_slug("platform", &platform)?;
    let renamed = convert_result(service.rename_platform(&slug, &name))?;
    Ok(Output::Platform(renamed))
}

/// Handle PlatformDelete command.
pub fn platform_delete(service: &CounterService, platform: String) -> Result<Output> {
    let slug = lookup_slug("platform", &platform)?;
    convert_result(service.delete_platform(&slug))?;
    Ok(Output::Deleted)
}

/// Handle PlatformList command.
pub fn platform_list(service: &CounterService) -> Result<Output> {
    Ok(Output::Platforms(convert_result(service.list_platforms())?))
}

// =============================================================================
// Elements
// =============================================================================

/// Handle ElementCreate command.
pub fn element_create(service: &CounterService, platform: String, name: String) -> Result<Output> {
    let slug = lookup_slug("platform", &platform)?;
    let element = convert_result(service.create_element(&slug, &name))?;
    Ok(Output::ElementCreated(element))
}

/// Handle ElementRename command.
pub fn element_rename(
    service: &CounterService,
    platform: String,
    element: String,
    name: String,
) -> Result<Output> {
    let address = lookup_address(&platform, &element)?;
    let renamed = convert_result(service.rename_element(&address, &name))?;
    Ok(Output::Element(renamed))
}

/// Handle ElementDelete command.
pub fn element_delete(service: &CounterService, platform: String, element: String) -> Result<Output> {
    let address = lookup_address(&platform, &element)?;
    convert_result(service.delete_element(&address))?;
    Ok(Output::Deleted)
}

/// Handle ElementList command.
pub fn element_list(service: &CounterService, platform: String) -> Result<Output> {
    let slug = lookup_slug("platform", &platform)?;
    Ok(Output::Elements(convert_result(service.list_elements(&slug))?))
}

// =============================================================================
// Counters
// =============================================================================

/// Handle CounterCreate command.
pub fn counter_create(
    service: &CounterService,
    platform: String,
    element: String,
    name: String,
    max_value: i64,
) -> Result<Output> {
    let address = lookup_address(&platform, &element)?;
    let counter = convert_result(service.create_counter(&address, &name, max_value))?;
    Ok(Output::CounterCreated(counter))
}

/// Handle CounterUpdate command.
pub fn counter_update(
    service: &CounterService,
    platform: String,
    element: String,
    counter: String,
    name: Option<String>,
    max_value: Option<i64>,
) -> Result<Output> {
    let address = lookup_address(&platform, &element)?;
    let slug = lookup_slug("counter", &counter)?;
    let updated = convert_result(service.update_counter(
        &address,
        &slug,
        name.as_deref(),
        max_value,
    ))?;
    Ok(Output::Counter(updated))
}

/// Handle CounterDelete command.
pub fn counter_delete(
    service: &CounterService,
    platform: String,
    element: String,
    counter: String,
) -> Result<Output> {
    let address = lookup_address(&platform, &element)?;
    let slug = lookup_slug("counter", &counter)?;
    convert_result(service.delete_counter(&address, &slug))?;
    Ok(Output::Deleted)
}

/// Handle CounterList command.
pub fn counter_list(service: &CounterService, platform: String, element: String) -> Result<Output> {
    let address = lookup_address(&platform, &element)?;
    Ok(Output::Counters(convert_result(service.list_counters(&address))?))
}
