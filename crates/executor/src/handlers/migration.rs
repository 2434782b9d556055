//! Migration job command handlers.

use ceiling_engine::CounterService;

use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle MigrationList command.
pub fn migration_list(service: &CounterService) -> Result<Output> {
    Ok(Output::Jobs(service.migration_jobs()))
}

/// Handle MigrationGet command.
pub fn migration_get(service: &CounterService, job_id: u64) -> Result<Output> {
    Ok(Output::Job(convert_result(service.migration_job(job_id))?))
}

/// Handle MigrationResume command.
pub fn migration_resume(service: &CounterService, job_id: u64) -> Result<Output> {
    Ok(Output::Job(convert_result(service.resume_migration(job_id))?))
}

/// Handle MigrationCancel command.
pub fn migration_cancel(service: &CounterService) -> Result<Output> {
    service.cancel_migrations();
    Ok(Output::Unit)
}
