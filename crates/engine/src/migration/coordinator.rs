//! Migration job runner
//!
//! Drives a ledger job over its sets one record at a time. Each record step
//! is idempotent and the ledger cursor moves after every record, so a run
//! that stops for any reason (error, cancellation, record budget) can be
//! resumed without redoing or skipping work.

use super::job::{FollowUp, MigrationJob, MigrationKind};
use super::ledger::MigrationLedger;
use crate::cancel::CancelToken;
use ceiling_core::{
    Catalog, CeilingError, CeilingResult, CounterId, Record, RecordKey, RecordVisitor,
    ScanControl, SetAddress, ValueStore,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-record action of a scanning job
#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    AddBin(CounterId),
    DropBin(CounterId),
    MoveTo(&'a SetAddress),
}

/// Visitor applying one job step per record
struct StepVisitor<'a> {
    store: &'a dyn ValueStore,
    ledger: &'a MigrationLedger,
    cancel: &'a CancelToken,
    job_id: u64,
    set: usize,
    step: Step<'a>,
    /// Records this run may still process; `None` is unbounded
    remaining: Option<u64>,
    paused: bool,
}

impl RecordVisitor for StepVisitor<'_> {
    fn visit(&mut self, key: &RecordKey, record: &Record) -> CeilingResult<ScanControl> {
        self.cancel.check()?;
        if self.remaining == Some(0) {
            self.paused = true;
            return Ok(ScanControl::Stop);
        }

        match self.step {
            Step::AddBin(counter) => {
                self.store.insert_bin_if_absent(key, counter, 0)?;
            }
            Step::DropBin(counter) => {
                self.store.remove_bin(key, counter)?;
            }
            Step::MoveTo(target) => move_record(self.store, key, record, target)?,
        }

        self.ledger.advance(self.job_id, self.set, key.id)?;
        if let Some(left) = self.remaining.as_mut() {
            *left -= 1;
        }
        Ok(ScanControl::Continue)
    }
}

/// Relocate one record: write at the target first, then remove the source
///
/// A copy already at the target that equals the source is left from an
/// earlier run and only the source is removed. A different record at the
/// target is never overwritten; the move fails with `AlreadyExists` and the
/// source stays in place.
fn move_record(
    store: &dyn ValueStore,
    key: &RecordKey,
    record: &Record,
    target: &SetAddress,
) -> CeilingResult<()> {
    let destination = target.key(key.id);
    match store.insert_new(&destination, record.clone()) {
        Ok(()) => {}
        Err(CeilingError::AlreadyExists { .. }) => {
            if store.get(&destination)?.as_ref() != Some(record) {
                return Err(CeilingError::already_exists(format!(
                    "record {} in {}; relocation from {} would overwrite it",
                    key.id, target, key.address
                )));
            }
        }
        Err(e) => return Err(e),
    }
    store.remove(key)?;
    Ok(())
}

enum RunOutcome {
    Done,
    Paused,
}

/// Runs ledger jobs against a store and catalog
pub struct MigrationCoordinator {
    store: Arc<dyn ValueStore>,
    catalog: Arc<dyn Catalog>,
    ledger: MigrationLedger,
}

impl MigrationCoordinator {
    /// Create a coordinator with an empty ledger
    pub fn new(store: Arc<dyn ValueStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            store,
            catalog,
            ledger: MigrationLedger::new(),
        }
    }

    /// Job ledger
    pub fn ledger(&self) -> &MigrationLedger {
        &self.ledger
    }

    /// Record a job without running it
    pub fn enqueue(&self, kind: MigrationKind, follow_up: Option<FollowUp>) -> u64 {
        let id = self.ledger.enqueue(kind, follow_up);
        debug!(target: "ceiling::migration", job_id = id, "Migration job recorded");
        id
    }

    /// Run (or resume) a job until it completes
    pub fn run(&self, job_id: u64, cancel: &CancelToken) -> CeilingResult<MigrationJob> {
        self.run_bounded(job_id, cancel, None)
    }

    /// Run (or resume) a job, processing at most `max_records` records
    ///
    /// Running a completed job returns it unchanged.
    ///
    /// # Errors
    ///
    /// - `JobNotFound` for an unknown id
    /// - `MigrationInProgress` if the job is already running
    /// - `MigrationIncomplete` if the run stopped early; the job keeps its
    ///   cursor and can be run again
    pub fn run_bounded(
        &self,
        job_id: u64,
        cancel: &CancelToken,
        max_records: Option<u64>,
    ) -> CeilingResult<MigrationJob> {
        let job = self.ledger.start_run(job_id)?;
        if job.state.is_completed() {
            return Ok(job);
        }

        info!(
            target: "ceiling::migration",
            job_id,
            kind = job.kind.name(),
            attempt = job.attempts,
            set = job.cursor.set,
            "Migration job running"
        );

        let outcome = self
            .drive(&job, cancel, max_records)
            .and_then(|outcome| match outcome {
                RunOutcome::Done => self
                    .apply_follow_up(job.follow_up)
                    .map(|_| RunOutcome::Done),
                RunOutcome::Paused => Ok(RunOutcome::Paused),
            });

        match outcome {
            Ok(RunOutcome::Done) => {
                let job = self.ledger.complete(job_id)?;
                info!(
                    target: "ceiling::migration",
                    job_id,
                    processed = job.processed,
                    "Migration job completed"
                );
                Ok(job)
            }
            Ok(RunOutcome::Paused) => self.interrupted(job_id, "record budget exhausted"),
            Err(CeilingError::Cancelled) => self.interrupted(job_id, "cancelled"),
            Err(e) => self.interrupted(job_id, e.to_string()),
        }
    }

    fn interrupted(&self, job_id: u64, reason: impl Into<String>) -> CeilingResult<MigrationJob> {
        let reason = reason.into();
        let job = self.ledger.interrupt(job_id, reason.clone())?;
        warn!(
            target: "ceiling::migration",
            job_id,
            processed = job.processed,
            reason = %reason,
            "Migration job incomplete"
        );
        Err(CeilingError::MigrationIncomplete {
            job_id,
            processed: job.processed,
            reason,
        })
    }

    fn drive(
        &self,
        job: &MigrationJob,
        cancel: &CancelToken,
        max_records: Option<u64>,
    ) -> CeilingResult<RunOutcome> {
        let sets = job.kind.source_sets();
        let mut remaining = max_records;

        for index in job.cursor.set..sets.len() {
            cancel.check()?;
            let source = &sets[index];

            let step = match &job.kind {
                MigrationKind::Purge { .. } => {
                    let removed = self.store.truncate(source)?;
                    debug!(target: "ceiling::migration", job_id = job.id, address = %source, removed, "Set truncated");
                    self.ledger.finish_set(job.id, index, removed as u64)?;
                    continue;
                }
                MigrationKind::AddCounter { counter, .. } => Step::AddBin(*counter),
                MigrationKind::RemoveCounter { counter, .. } => Step::DropBin(*counter),
                MigrationKind::Relocate { moves } => Step::MoveTo(&moves[index].to),
            };

            let after = if index == job.cursor.set {
                job.cursor.after
            } else {
                None
            };
            let mut visitor = StepVisitor {
                store: self.store.as_ref(),
                ledger: &self.ledger,
                cancel,
                job_id: job.id,
                set: index,
                step,
                remaining,
                paused: false,
            };
            self.store.scan(source, after, &mut visitor)?;
            if visitor.paused {
                return Ok(RunOutcome::Paused);
            }
            remaining = visitor.remaining;

            if let Step::MoveTo(target) = step {
                // Records created at the old address mid-scan
                let residue = self.store.truncate(source)?;
                if residue > 0 {
                    warn!(
                        target: "ceiling::migration",
                        job_id = job.id,
                        from = %source,
                        to = %target,
                        residue,
                        "Purged residue after relocation"
                    );
                }
            }
            self.ledger.finish_set(job.id, index, 0)?;
        }
        Ok(RunOutcome::Done)
    }

    fn apply_follow_up(&self, follow_up: Option<FollowUp>) -> CeilingResult<()> {
        match follow_up {
            None => {}
            Some(FollowUp::RemoveCounter(id)) => {
                self.catalog.remove_counter(id)?;
            }
            Some(FollowUp::RemoveElement(id)) => {
                self.catalog.remove_element(id)?;
            }
            Some(FollowUp::RemovePlatform(id)) => {
                self.catalog.remove_platform(id)?;
            }
        }
        Ok(())
    }
}
