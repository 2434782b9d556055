//! Jobs that stop early and are resumed from their cursor.

use crate::common::*;
use ceiling_engine::CancelToken;

fn incomplete_job_id(err: CeilingError) -> u64 {
    match err {
        CeilingError::MigrationIncomplete { job_id, .. } => job_id,
        other => panic!("expected MigrationIncomplete, got {:?}", other),
    }
}

#[test]
fn budgeted_rename_resumes_to_completion() {
    let service = seeded_service(budgeted_config(2), 20);
    seed_records(&service, 1..=5);
    let account = addr("google", "account");
    let billing = addr("google", "billing");

    let err = service.rename_element(&account, "Billing").unwrap_err();
    let job_id = incomplete_job_id(err);

    // Catalog already points at the new address; records are split
    assert_eq!(service.store().record_count(&billing).unwrap(), 2);
    assert_eq!(service.store().record_count(&account).unwrap(), 3);
    let job = service.migration_job(job_id).unwrap();
    assert!(matches!(job.state, JobState::Incomplete { .. }));
    assert_eq!(job.processed, 2);

    let err = service.resume_migration(job_id).unwrap_err();
    assert_eq!(incomplete_job_id(err), job_id);

    let job = service.resume_migration(job_id).unwrap();
    assert_eq!(job.state, JobState::Completed);
    assert_eq!(job.processed, 5);
    assert_eq!(job.attempts, 3);
    assert_eq!(service.store().record_count(&billing).unwrap(), 5);
    assert_eq!(service.store().record_count(&account).unwrap(), 0);

    // Resuming a finished job is a no-op
    let again = service.resume_migration(job_id).unwrap();
    assert_eq!(again.attempts, 3);
}

#[test]
fn cancelled_job_resumes_where_it_stopped() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1, 2]);
    let account = addr("google", "account");
    let counter = service.create_counter(&account, "Writes", 5).unwrap();

    // Drive a removal job by hand with an already-cancelled token
    let coordinator = service.coordinator();
    let job_id = coordinator.enqueue(
        MigrationKind::RemoveCounter {
            address: account.clone(),
            counter: counter.id,
        },
        None,
    );
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = coordinator.run(job_id, &cancel).unwrap_err();
    match err {
        CeilingError::MigrationIncomplete { reason, .. } => assert_eq!(reason, "cancelled"),
        other => panic!("expected MigrationIncomplete, got {:?}", other),
    }
    let stored = service.store().get(&account.key(RecordId(1))).unwrap().unwrap();
    assert_eq!(stored.value(counter.id), Some(0));

    let job = service.resume_migration(job_id).unwrap();
    assert!(job.state.is_completed());
    let stored = service.store().get(&account.key(RecordId(1))).unwrap().unwrap();
    assert_eq!(stored.value(counter.id), None);
}

#[test]
fn unknown_job_is_not_found() {
    let service = seeded_service(CeilingConfig::default(), 20);
    let err = service.resume_migration(999).unwrap_err();
    assert!(matches!(err, CeilingError::JobNotFound { job_id: 999 }));
}
