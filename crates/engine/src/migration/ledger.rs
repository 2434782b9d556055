//! Migration ledger
//!
//! Keeps every job ever recorded, with its state and cursor, so an
//! interrupted job can be inspected and resumed.

use super::job::{FollowUp, JobCursor, JobState, MigrationJob, MigrationKind};
use ceiling_core::{CeilingError, CeilingResult, RecordId};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory job ledger
#[derive(Debug, Default)]
pub struct MigrationLedger {
    jobs: RwLock<BTreeMap<u64, MigrationJob>>,
    next_id: AtomicU64,
}

impl MigrationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new pending job and return its id
    pub fn enqueue(&self, kind: MigrationKind, follow_up: Option<FollowUp>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.jobs
            .write()
            .insert(id, MigrationJob::new(id, kind, follow_up));
        id
    }

    /// Copy of a job
    pub fn get(&self, id: u64) -> CeilingResult<MigrationJob> {
        self.jobs
            .read()
            .get(&id)
            .cloned()
            .ok_or(CeilingError::JobNotFound { job_id: id })
    }

    /// Every job, oldest first
    pub fn list(&self) -> Vec<MigrationJob> {
        self.jobs.read().values().cloned().collect()
    }

    /// Jobs that still need a run
    pub fn unfinished(&self) -> Vec<MigrationJob> {
        self.jobs
            .read()
            .values()
            .filter(|j| !j.state.is_completed())
            .cloned()
            .collect()
    }

    fn update<T>(&self, id: u64, f: impl FnOnce(&mut MigrationJob) -> T) -> CeilingResult<T> {
        let mut jobs = self.jobs.write();
        let job = jobs
            .get_mut(&id)
            .ok_or(CeilingError::JobNotFound { job_id: id })?;
        Ok(f(job))
    }

    /// Mark a run as started and return the job as it stands
    ///
    /// # Errors
    ///
    /// `MigrationInProgress` if another run of the same job is active.
    pub fn start_run(&self, id: u64) -> CeilingResult<MigrationJob> {
        self.update(id, |job| {
            if job.state == JobState::Running {
                return Err(CeilingError::MigrationInProgress {
                    address: format!("job {}", id),
                });
            }
            if !job.state.is_completed() {
                job.state = JobState::Running;
                job.attempts += 1;
            }
            Ok(job.clone())
        })?
    }

    /// Record one processed record
    pub fn advance(&self, id: u64, set: usize, record: RecordId) -> CeilingResult<()> {
        self.update(id, |job| {
            job.cursor = JobCursor {
                set,
                after: Some(record),
            };
            job.processed += 1;
        })
    }

    /// Record a fully walked set; `removed` counts records dropped in bulk
    pub fn finish_set(&self, id: u64, set: usize, removed: u64) -> CeilingResult<()> {
        self.update(id, |job| {
            job.cursor = JobCursor {
                set: set + 1,
                after: None,
            };
            job.processed += removed;
        })
    }

    /// Mark the job completed
    pub fn complete(&self, id: u64) -> CeilingResult<MigrationJob> {
        self.update(id, |job| {
            job.state = JobState::Completed;
            job.finished_at = Some(Utc::now());
            job.clone()
        })
    }

    /// Mark the job incomplete
    pub fn interrupt(&self, id: u64, reason: impl Into<String>) -> CeilingResult<MigrationJob> {
        let reason = reason.into();
        self.update(id, |job| {
            job.state = JobState::Incomplete { reason };
            job.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceiling_core::{SetAddress, Slug};

    fn purge() -> MigrationKind {
        MigrationKind::Purge {
            addresses: vec![SetAddress::new(
                Slug::new("g").unwrap(),
                Slug::new("a").unwrap(),
            )],
        }
    }

    #[test]
    fn test_ids_start_at_one() {
        let ledger = MigrationLedger::new();
        assert_eq!(ledger.enqueue(purge(), None), 1);
        assert_eq!(ledger.enqueue(purge(), None), 2);
        assert_eq!(ledger.list().len(), 2);
    }

    #[test]
    fn test_unknown_job() {
        let ledger = MigrationLedger::new();
        assert_eq!(
            ledger.get(9).unwrap_err(),
            CeilingError::JobNotFound { job_id: 9 }
        );
    }

    #[test]
    fn test_progress_and_completion() {
        let ledger = MigrationLedger::new();
        let id = ledger.enqueue(purge(), None);

        let job = ledger.start_run(id).unwrap();
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.attempts, 1);

        ledger.advance(id, 0, RecordId(5)).unwrap();
        ledger.advance(id, 0, RecordId(8)).unwrap();
        let job = ledger.get(id).unwrap();
        assert_eq!(job.cursor.after, Some(RecordId(8)));
        assert_eq!(job.processed, 2);

        ledger.finish_set(id, 0, 3).unwrap();
        let job = ledger.complete(id).unwrap();
        assert_eq!(job.cursor, JobCursor { set: 1, after: None });
        assert_eq!(job.processed, 5);
        assert!(job.finished_at.is_some());
        assert!(ledger.unfinished().is_empty());
    }

    #[test]
    fn test_running_job_cannot_start_twice() {
        let ledger = MigrationLedger::new();
        let id = ledger.enqueue(purge(), None);
        ledger.start_run(id).unwrap();
        assert!(matches!(
            ledger.start_run(id),
            Err(CeilingError::MigrationInProgress { .. })
        ));
    }

    #[test]
    fn test_interrupted_job_restarts() {
        let ledger = MigrationLedger::new();
        let id = ledger.enqueue(purge(), None);
        ledger.start_run(id).unwrap();
        ledger.interrupt(id, "cancelled").unwrap();
        assert_eq!(ledger.unfinished().len(), 1);

        let job = ledger.start_run(id).unwrap();
        assert_eq!(job.attempts, 2);
    }
}
