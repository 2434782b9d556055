//! In-memory catalog store
//!
//! Holds platform, element and counter rows behind a single
//! `parking_lot::RwLock`. Ids are allocated from one monotonic sequence per
//! row type and never reused.

use ceiling_core::{
    Catalog, CeilingError, CeilingResult, CounterDef, CounterId, Element, ElementId, Platform,
    PlatformId, SetAddress, Slug,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct CatalogInner {
    platforms: BTreeMap<PlatformId, Platform>,
    elements: BTreeMap<ElementId, Element>,
    counters: BTreeMap<CounterId, CounterDef>,
    next_platform: u64,
    next_element: u64,
    next_counter: u64,
}

impl CatalogInner {
    fn platform_by_slug(&self, slug: &Slug) -> Option<&Platform> {
        self.platforms.values().find(|p| &p.slug == slug)
    }

    fn remove_counters_of(&mut self, element: ElementId) {
        self.counters.retain(|_, c| c.element_id != element);
    }
}

/// Catalog rows held in memory
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: RwLock<CatalogInner>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(what: &str, id: impl std::fmt::Display) -> CeilingError {
    CeilingError::not_found(format!("{} {}", what, id))
}

impl Catalog for MemoryCatalog {
    fn platform(&self, slug: &Slug) -> CeilingResult<Option<Platform>> {
        Ok(self.inner.read().platform_by_slug(slug).cloned())
    }

    fn platform_by_id(&self, id: PlatformId) -> CeilingResult<Option<Platform>> {
        Ok(self.inner.read().platforms.get(&id).cloned())
    }

    fn platforms(&self) -> CeilingResult<Vec<Platform>> {
        Ok(self.inner.read().platforms.values().cloned().collect())
    }

    fn element(&self, address: &SetAddress) -> CeilingResult<Option<Element>> {
        let inner = self.inner.read();
        let Some(platform) = inner.platform_by_slug(&address.platform) else {
            return Ok(None);
        };
        Ok(inner
            .elements
            .values()
            .find(|e| e.platform_id == platform.id && e.slug == address.element)
            .cloned())
    }

    fn elements_of(&self, platform: PlatformId) -> CeilingResult<Vec<Element>> {
        Ok(self
            .inner
            .read()
            .elements
            .values()
            .filter(|e| e.platform_id == platform)
            .cloned()
            .collect())
    }

    fn counter(&self, element: ElementId, slug: &Slug) -> CeilingResult<Option<CounterDef>> {
        Ok(self
            .inner
            .read()
            .counters
            .values()
            .find(|c| c.element_id == element && &c.slug == slug)
            .cloned())
    }

    fn counter_by_id(&self, id: CounterId) -> CeilingResult<Option<CounterDef>> {
        Ok(self.inner.read().counters.get(&id).cloned())
    }

    fn counters_of(&self, element: ElementId) -> CeilingResult<Vec<CounterDef>> {
        Ok(self
            .inner
            .read()
            .counters
            .values()
            .filter(|c| c.element_id == element)
            .cloned()
            .collect())
    }

    fn insert_platform(&self, name: &str, slug: Slug) -> CeilingResult<Platform> {
        let mut inner = self.inner.write();
        if inner.platform_by_slug(&slug).is_some() {
            return Err(CeilingError::already_exists(format!("platform {}", slug)));
        }
        inner.next_platform += 1;
        let platform = Platform {
            id: PlatformId(inner.next_platform),
            name: name.to_string(),
            slug,
        };
        inner.platforms.insert(platform.id, platform.clone());
        Ok(platform)
    }

    fn insert_element(
        &self,
        platform: PlatformId,
        name: &str,
        slug: Slug,
    ) -> CeilingResult<Element> {
        let mut inner = self.inner.write();
        if !inner.platforms.contains_key(&platform) {
            return Err(missing("platform", platform));
        }
        if inner
            .elements
            .values()
            .any(|e| e.platform_id == platform && e.slug == slug)
        {
            return Err(CeilingError::already_exists(format!("element {}", slug)));
        }
        inner.next_element += 1;
        let element = Element {
            id: ElementId(inner.next_element),
            name: name.to_string(),
            slug,
            platform_id: platform,
        };
        inner.elements.insert(element.id, element.clone());
        Ok(element)
    }

    fn insert_counter(
        &self,
        element: ElementId,
        name: &str,
        slug: Slug,
        max_value: i64,
    ) -> CeilingResult<CounterDef> {
        let mut inner = self.inner.write();
        if !inner.elements.contains_key(&element) {
            return Err(missing("element", element));
        }
        if inner
            .counters
            .values()
            .any(|c| c.element_id == element && c.slug == slug)
        {
            return Err(CeilingError::already_exists(format!("counter {}", slug)));
        }
        inner.next_counter += 1;
        let counter = CounterDef {
            id: CounterId(inner.next_counter),
            name: name.to_string(),
            slug,
            max_value,
            element_id: element,
        };
        inner.counters.insert(counter.id, counter.clone());
        Ok(counter)
    }

    fn rename_platform(&self, id: PlatformId, name: &str, slug: Slug) -> CeilingResult<Platform> {
        let mut inner = self.inner.write();
        let platform = inner
            .platforms
            .get_mut(&id)
            .ok_or_else(|| missing("platform", id))?;
        platform.name = name.to_string();
        platform.slug = slug;
        Ok(platform.clone())
    }

    fn rename_element(&self, id: ElementId, name: &str, slug: Slug) -> CeilingResult<Element> {
        let mut inner = self.inner.write();
        let element = inner
            .elements
            .get_mut(&id)
            .ok_or_else(|| missing("element", id))?;
        element.name = name.to_string();
        element.slug = slug;
        Ok(element.clone())
    }

    fn rename_counter(&self, id: CounterId, name: &str, slug: Slug) -> CeilingResult<CounterDef> {
        let mut inner = self.inner.write();
        let counter = inner
            .counters
            .get_mut(&id)
            .ok_or_else(|| missing("counter", id))?;
        counter.name = name.to_string();
        counter.slug = slug;
        Ok(counter.clone())
    }

    fn set_max_value(&self, id: CounterId, max_value: i64) -> CeilingResult<CounterDef> {
        let mut inner = self.inner.write();
        let counter = inner
            .counters
            .get_mut(&id)
            .ok_or_else(|| missing("counter", id))?;
        counter.max_value = max_value;
        Ok(counter.clone())
    }

    fn remove_platform(&self, id: PlatformId) -> CeilingResult<bool> {
        let mut inner = self.inner.write();
        if inner.platforms.remove(&id).is_none() {
            return Ok(false);
        }
        let elements: Vec<ElementId> = inner
            .elements
            .values()
            .filter(|e| e.platform_id == id)
            .map(|e| e.id)
            .collect();
        for element in elements {
            inner.elements.remove(&element);
            inner.remove_counters_of(element);
        }
        Ok(true)
    }

    fn remove_element(&self, id: ElementId) -> CeilingResult<bool> {
        let mut inner = self.inner.write();
        if inner.elements.remove(&id).is_none() {
            return Ok(false);
        }
        inner.remove_counters_of(id);
        Ok(true)
    }

    fn remove_counter(&self, id: CounterId) -> CeilingResult<bool> {
        Ok(self.inner.write().counters.remove(&id).is_some())
    }
}
