//! Counter service: the catalog CRUD layer over the three engines
//!
//! Every catalog mutation that changes where or how records are stored runs
//! a migration job while holding the single-flight guard for each set
//! address it touches:
//!
//! | Operation | Order |
//! |-----------|-------|
//! | rename platform / element | commit catalog, then relocate records |
//! | delete platform / element | truncate sets, then remove catalog row |
//! | create counter | insert catalog row, then add a zero value to records |
//! | delete counter | remove values from records, then remove catalog row |
//! | change ceiling | validate every record, then commit catalog |
//!
//! A job that stops early surfaces as `MigrationIncomplete` with its ledger
//! id; `resume_migration` picks it up from its cursor.

use crate::cancel::CancelToken;
use crate::config::CeilingConfig;
use crate::guard::{GuardClaim, MigrationGuard};
use crate::increment::IncrementEngine;
use crate::lifecycle::RecordManager;
use crate::migration::{FollowUp, MigrationCoordinator, MigrationJob, MigrationKind, Relocation};
use crate::resolve;
use ceiling_core::{
    Catalog, CeilingError, CeilingResult, CounterDef, Element, Platform, RecordId, RecordView,
    SetAddress, Slug, SlugKind, ValueStore,
};
use ceiling_storage::{MemoryCatalog, ShardedStore};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Reject `name` if a sibling already uses it or its slug
fn ensure_unique<'a>(
    kind: SlugKind,
    name: &str,
    slug: &Slug,
    siblings: impl IntoIterator<Item = (&'a str, &'a Slug)>,
) -> CeilingResult<()> {
    for (sibling_name, sibling_slug) in siblings {
        if sibling_name == name {
            return Err(CeilingError::invalid_input(format!(
                "{} named '{}' already exists",
                kind, name
            )));
        }
        if sibling_slug == slug {
            return Err(CeilingError::invalid_input(format!(
                "{} with a similar name already exists ('{}')",
                kind, slug
            )));
        }
    }
    Ok(())
}

/// Catalog and record operations with migrations wired in
pub struct CounterService {
    config: CeilingConfig,
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn ValueStore>,
    records: RecordManager,
    increments: IncrementEngine,
    migrations: MigrationCoordinator,
    guard: MigrationGuard,
    cancel: Mutex<CancelToken>,
}

impl CounterService {
    /// Service over injected backends
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or the store fails its health check.
    pub fn new(
        config: CeilingConfig,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn ValueStore>,
    ) -> CeilingResult<Self> {
        config.validate()?;
        store.health_check()?;
        info!(
            target: "ceiling::store",
            namespace = store.namespace(),
            mode = ?config.increment_mode,
            "Counter service ready"
        );
        Ok(Self {
            records: RecordManager::new(catalog.clone(), store.clone()),
            increments: IncrementEngine::new(
                catalog.clone(),
                store.clone(),
                config.increment_mode,
                config.limits.clone(),
            ),
            migrations: MigrationCoordinator::new(store.clone(), catalog.clone()),
            guard: MigrationGuard::new(),
            cancel: Mutex::new(CancelToken::new()),
            config,
            catalog,
            store,
        })
    }

    /// Service over a fresh in-memory store and catalog
    pub fn open(config: CeilingConfig) -> CeilingResult<Self> {
        let store = ShardedStore::connect(config.namespace.clone());
        let catalog = Arc::new(MemoryCatalog::new());
        Self::new(config, catalog, store)
    }

    /// Active configuration
    pub fn config(&self) -> &CeilingConfig {
        &self.config
    }

    /// Catalog handle
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Value store handle
    pub fn store(&self) -> &Arc<dyn ValueStore> {
        &self.store
    }

    /// Job runner, for driving ledger jobs directly
    pub fn coordinator(&self) -> &MigrationCoordinator {
        &self.migrations
    }

    /// Fails once the store has been shut down
    pub fn health_check(&self) -> CeilingResult<()> {
        self.store.health_check()
    }

    /// Shut down the value store
    pub fn shutdown(&self) {
        info!(target: "ceiling::store", namespace = self.store.namespace(), "Shutting down");
        self.store.shutdown();
    }

    /// Stop every migration currently running; later runs are unaffected
    pub fn cancel_migrations(&self) {
        let mut token = self.cancel.lock();
        token.cancel();
        *token = CancelToken::new();
    }

    fn slug_for(&self, kind: SlugKind, name: &str) -> CeilingResult<Slug> {
        let slug = Slug::from_name(name)?;
        self.config.limits.validate_slug(kind, &slug)?;
        Ok(slug)
    }

    /// Claim `sets` for a catalog change
    ///
    /// Besides the guard, a set stays reserved while any unfinished job
    /// other than `resuming` still moves records in or out of it. Both are
    /// checked under the claim so no job can slip in between.
    fn claim(
        &self,
        sets: impl IntoIterator<Item = SetAddress>,
        resuming: Option<u64>,
    ) -> CeilingResult<GuardClaim<'_>> {
        let wanted: BTreeSet<SetAddress> = sets.into_iter().collect();
        let claim = self.guard.acquire(wanted.iter().cloned())?;
        for job in self.migrations.ledger().unfinished() {
            if Some(job.id) == resuming {
                continue;
            }
            if let Some(busy) = job.kind.touched_sets().into_iter().find(|a| wanted.contains(a)) {
                debug!(
                    target: "ceiling::migration",
                    job_id = job.id,
                    address = %busy,
                    "Set address reserved by unfinished job"
                );
                return Err(CeilingError::MigrationInProgress {
                    address: busy.to_string(),
                });
            }
        }
        Ok(claim)
    }

    fn run_job(&self, job_id: u64) -> CeilingResult<MigrationJob> {
        let cancel = self.cancel.lock().clone();
        self.migrations
            .run_bounded(job_id, &cancel, self.config.migration.max_records_per_run)
    }

    /// Every set address belonging to a platform, from the catalog and the store
    fn platform_sets(&self, platform: &Platform) -> CeilingResult<Vec<SetAddress>> {
        let mut sets: BTreeSet<SetAddress> = self
            .catalog
            .elements_of(platform.id)?
            .into_iter()
            .map(|e| SetAddress::new(platform.slug.clone(), e.slug))
            .collect();
        sets.extend(
            self.store
                .addresses()?
                .into_iter()
                .filter(|a| a.platform == platform.slug),
        );
        Ok(sets.into_iter().collect())
    }

    // ========== Platforms ==========

    /// Create a platform
    pub fn create_platform(&self, name: &str) -> CeilingResult<Platform> {
        let slug = self.slug_for(SlugKind::Platform, name)?;
        let siblings = self.catalog.platforms()?;
        ensure_unique(
            SlugKind::Platform,
            name,
            &slug,
            siblings.iter().map(|p| (p.name.as_str(), &p.slug)),
        )?;
        let platform = self.catalog.insert_platform(name, slug)?;
        info!(target: "ceiling::catalog", platform = %platform.slug, "Platform created");
        Ok(platform)
    }

    /// Rename a platform and relocate every record under it
    pub fn rename_platform(&self, slug: &Slug, name: &str) -> CeilingResult<Platform> {
        let platform = resolve::platform(self.catalog.as_ref(), slug)?;
        let new_slug = self.slug_for(SlugKind::Platform, name)?;
        let siblings = self.catalog.platforms()?;
        ensure_unique(
            SlugKind::Platform,
            name,
            &new_slug,
            siblings
                .iter()
                .filter(|p| p.id != platform.id)
                .map(|p| (p.name.as_str(), &p.slug)),
        )?;

        if new_slug == platform.slug {
            return self.catalog.rename_platform(platform.id, name, new_slug);
        }

        let moves: Vec<Relocation> = self
            .platform_sets(&platform)?
            .into_iter()
            .map(|from| Relocation {
                to: from.with_platform(new_slug.clone()),
                from,
            })
            .collect();
        let kind = MigrationKind::Relocate { moves };
        let _claim = self.claim(kind.touched_sets(), None)?;

        let renamed = self.catalog.rename_platform(platform.id, name, new_slug)?;
        info!(target: "ceiling::catalog", from = %platform.slug, to = %renamed.slug, "Platform renamed");
        let job_id = self.migrations.enqueue(kind, None);
        self.run_job(job_id)?;
        Ok(renamed)
    }

    /// Delete a platform with its elements, counters and records
    pub fn delete_platform(&self, slug: &Slug) -> CeilingResult<()> {
        let platform = resolve::platform(self.catalog.as_ref(), slug)?;
        let kind = MigrationKind::Purge {
            addresses: self.platform_sets(&platform)?,
        };
        let _claim = self.claim(kind.touched_sets(), None)?;

        let job_id = self
            .migrations
            .enqueue(kind, Some(FollowUp::RemovePlatform(platform.id)));
        self.run_job(job_id)?;
        info!(target: "ceiling::catalog", platform = %platform.slug, "Platform deleted");
        Ok(())
    }

    /// Every platform
    pub fn list_platforms(&self) -> CeilingResult<Vec<Platform>> {
        self.catalog.platforms()
    }

    // ========== Elements ==========

    /// Create an element under a platform
    pub fn create_element(&self, platform: &Slug, name: &str) -> CeilingResult<Element> {
        let platform = resolve::platform(self.catalog.as_ref(), platform)?;
        let slug = self.slug_for(SlugKind::Element, name)?;
        let siblings = self.catalog.elements_of(platform.id)?;
        ensure_unique(
            SlugKind::Element,
            name,
            &slug,
            siblings.iter().map(|e| (e.name.as_str(), &e.slug)),
        )?;
        // A renamed element may still have records waiting at this address
        let _claim = self.claim([SetAddress::new(platform.slug.clone(), slug.clone())], None)?;
        let element = self.catalog.insert_element(platform.id, name, slug)?;
        info!(target: "ceiling::catalog", platform = %platform.slug, element = %element.slug, "Element created");
        Ok(element)
    }

    /// Rename an element and relocate its records
    pub fn rename_element(&self, address: &SetAddress, name: &str) -> CeilingResult<Element> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let new_slug = self.slug_for(SlugKind::Element, name)?;
        let siblings = self.catalog.elements_of(element.platform_id)?;
        ensure_unique(
            SlugKind::Element,
            name,
            &new_slug,
            siblings
                .iter()
                .filter(|e| e.id != element.id)
                .map(|e| (e.name.as_str(), &e.slug)),
        )?;

        if new_slug == element.slug {
            return self.catalog.rename_element(element.id, name, new_slug);
        }

        let kind = MigrationKind::Relocate {
            moves: vec![Relocation {
                from: address.clone(),
                to: address.with_element(new_slug.clone()),
            }],
        };
        let _claim = self.claim(kind.touched_sets(), None)?;

        let renamed = self.catalog.rename_element(element.id, name, new_slug)?;
        info!(target: "ceiling::catalog", from = %address, to = %renamed.slug, "Element renamed");
        let job_id = self.migrations.enqueue(kind, None);
        self.run_job(job_id)?;
        Ok(renamed)
    }

    /// Delete an element with its counters and records
    pub fn delete_element(&self, address: &SetAddress) -> CeilingResult<()> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let kind = MigrationKind::Purge {
            addresses: vec![address.clone()],
        };
        let _claim = self.claim(kind.touched_sets(), None)?;

        let job_id = self
            .migrations
            .enqueue(kind, Some(FollowUp::RemoveElement(element.id)));
        self.run_job(job_id)?;
        info!(target: "ceiling::catalog", element = %address, "Element deleted");
        Ok(())
    }

    /// Every element of a platform
    pub fn list_elements(&self, platform: &Slug) -> CeilingResult<Vec<Element>> {
        let platform = resolve::platform(self.catalog.as_ref(), platform)?;
        self.catalog.elements_of(platform.id)
    }

    // ========== Counters ==========

    /// Define a counter and give every existing record a zero value for it
    pub fn create_counter(
        &self,
        address: &SetAddress,
        name: &str,
        max_value: i64,
    ) -> CeilingResult<CounterDef> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let slug = self.slug_for(SlugKind::Counter, name)?;
        self.config.limits.validate_max_value(max_value)?;
        let siblings = self.catalog.counters_of(element.id)?;
        ensure_unique(
            SlugKind::Counter,
            name,
            &slug,
            siblings.iter().map(|c| (c.name.as_str(), &c.slug)),
        )?;
        let _claim = self.claim([address.clone()], None)?;

        let counter = self
            .catalog
            .insert_counter(element.id, name, slug, max_value)?;
        info!(
            target: "ceiling::catalog",
            element = %address,
            counter = %counter.slug,
            max_value,
            "Counter created"
        );
        let job_id = self.migrations.enqueue(
            MigrationKind::AddCounter {
                address: address.clone(),
                counter: counter.id,
            },
            None,
        );
        self.run_job(job_id)?;
        Ok(counter)
    }

    /// Rename a counter and/or change its ceiling
    ///
    /// Both inputs are validated before either is applied. Renaming never
    /// touches records, whose values are keyed by counter id.
    pub fn update_counter(
        &self,
        address: &SetAddress,
        counter: &Slug,
        name: Option<&str>,
        max_value: Option<i64>,
    ) -> CeilingResult<CounterDef> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let mut def = resolve::counter(self.catalog.as_ref(), address, &element, counter)?;

        let rename = match name {
            Some(name) => {
                let slug = self.slug_for(SlugKind::Counter, name)?;
                let siblings = self.catalog.counters_of(element.id)?;
                ensure_unique(
                    SlugKind::Counter,
                    name,
                    &slug,
                    siblings
                        .iter()
                        .filter(|c| c.id != def.id)
                        .map(|c| (c.name.as_str(), &c.slug)),
                )?;
                Some((name, slug))
            }
            None => None,
        };
        let _claim = self.claim([address.clone()], None)?;

        if let Some(max_value) = max_value {
            def = self.increments.change_ceiling(address, &def.slug, max_value)?;
        }
        if let Some((name, slug)) = rename {
            let old = def.slug.clone();
            def = self.catalog.rename_counter(def.id, name, slug)?;
            info!(target: "ceiling::catalog", element = %address, from = %old, to = %def.slug, "Counter renamed");
        }
        Ok(def)
    }

    /// Remove a counter's value from every record, then drop its definition
    pub fn delete_counter(&self, address: &SetAddress, counter: &Slug) -> CeilingResult<()> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        let def = resolve::counter(self.catalog.as_ref(), address, &element, counter)?;
        let _claim = self.claim([address.clone()], None)?;

        let job_id = self.migrations.enqueue(
            MigrationKind::RemoveCounter {
                address: address.clone(),
                counter: def.id,
            },
            Some(FollowUp::RemoveCounter(def.id)),
        );
        self.run_job(job_id)?;
        info!(target: "ceiling::catalog", element = %address, counter = %def.slug, "Counter deleted");
        Ok(())
    }

    /// Every counter of an element
    pub fn list_counters(&self, address: &SetAddress) -> CeilingResult<Vec<CounterDef>> {
        let element = resolve::element(self.catalog.as_ref(), address)?;
        self.catalog.counters_of(element.id)
    }

    // ========== Records ==========

    /// Create a record; see `RecordManager::create`
    ///
    /// An id still waiting to be relocated into `address` by an unfinished
    /// job already belongs to that record and is reported as existing.
    pub fn create_record(&self, address: &SetAddress, id: RecordId) -> CeilingResult<RecordView> {
        self.ensure_not_awaiting_move(address, id)?;
        self.records.create(address, id)
    }

    fn ensure_not_awaiting_move(&self, address: &SetAddress, id: RecordId) -> CeilingResult<()> {
        for job in self.migrations.ledger().unfinished() {
            let MigrationKind::Relocate { moves } = &job.kind else {
                continue;
            };
            for relocation in moves.iter().filter(|m| &m.to == address) {
                if self.store.exists(&relocation.from.key(id))? {
                    return Err(CeilingError::already_exists(format!(
                        "record {} in {} (awaiting relocation from {} by job {})",
                        id, address, relocation.from, job.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Every record of an element
    pub fn list_records(&self, address: &SetAddress) -> CeilingResult<Vec<RecordView>> {
        self.records.list(address)
    }

    /// One record
    pub fn get_record(&self, address: &SetAddress, id: RecordId) -> CeilingResult<RecordView> {
        self.records.get(address, id)
    }

    /// Remove one record
    pub fn delete_record(&self, address: &SetAddress, id: RecordId) -> CeilingResult<()> {
        self.records.delete(address, id)
    }

    /// Current value of one counter on one record
    pub fn get_value(
        &self,
        address: &SetAddress,
        id: RecordId,
        counter: &Slug,
    ) -> CeilingResult<i64> {
        self.increments.get(address, id, counter)
    }

    /// Bounded increment; see `IncrementEngine::increment`
    pub fn increment(
        &self,
        address: &SetAddress,
        id: RecordId,
        counter: &Slug,
        delta: i64,
    ) -> CeilingResult<i64> {
        self.increments.increment(address, id, counter, delta)
    }

    // ========== Migration jobs ==========

    /// Every migration job, oldest first
    pub fn migration_jobs(&self) -> Vec<MigrationJob> {
        self.migrations.ledger().list()
    }

    /// One migration job
    pub fn migration_job(&self, job_id: u64) -> CeilingResult<MigrationJob> {
        self.migrations.ledger().get(job_id)
    }

    /// Continue a job from its cursor
    ///
    /// Resuming a completed job returns it unchanged.
    pub fn resume_migration(&self, job_id: u64) -> CeilingResult<MigrationJob> {
        let job = self.migrations.ledger().get(job_id)?;
        if job.state.is_completed() {
            return Ok(job);
        }
        let _claim = self.claim(job.kind.touched_sets(), Some(job_id))?;
        info!(target: "ceiling::migration", job_id, processed = job.processed, "Resuming migration job");
        self.run_job(job_id)
    }
}
