//! Catalog lookups that fail with `NotFound`

use ceiling_core::{
    Catalog, CeilingError, CeilingResult, CounterDef, Element, Platform, RecordId, SetAddress,
    Slug,
};

pub(crate) fn platform(catalog: &dyn Catalog, slug: &Slug) -> CeilingResult<Platform> {
    catalog
        .platform(slug)?
        .ok_or_else(|| CeilingError::not_found(format!("platform {}", slug)))
}

pub(crate) fn element(catalog: &dyn Catalog, address: &SetAddress) -> CeilingResult<Element> {
    catalog
        .element(address)?
        .ok_or_else(|| CeilingError::not_found(format!("element {}", address)))
}

pub(crate) fn counter(
    catalog: &dyn Catalog,
    address: &SetAddress,
    element: &Element,
    slug: &Slug,
) -> CeilingResult<CounterDef> {
    catalog
        .counter(element.id, slug)?
        .ok_or_else(|| CeilingError::not_found(format!("counter {} in {}", slug, address)))
}

pub(crate) fn record_missing(address: &SetAddress, id: RecordId) -> CeilingError {
    CeilingError::not_found(format!("record {} in {}", id, address))
}
