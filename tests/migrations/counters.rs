//! Counter definitions added, removed and re-ceilinged over live records.

use crate::common::*;

#[test]
fn new_counter_backfills_existing_records() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1, 2]);
    let account = addr("google", "account");

    service.create_counter(&account, "Writes", 3).unwrap();
    for record in service.list_records(&account).unwrap() {
        let writes = record.counters["writes"];
        assert_eq!(writes.value, 0);
        assert_eq!(writes.max, 3);
    }
    assert_eq!(
        service
            .increment(&account, RecordId(1), &slug("writes"), 3)
            .unwrap(),
        3
    );
}

#[test]
fn removed_counter_disappears_from_records() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1, 2]);
    let account = addr("google", "account");
    service.create_counter(&account, "Writes", 3).unwrap();

    service.delete_counter(&account, &slug("writes")).unwrap();
    for record in service.list_records(&account).unwrap() {
        assert!(!record.counters.contains_key("writes"));
        assert!(record.counters.contains_key("requests"));
    }
    let err = service
        .increment(&account, RecordId(1), &slug("writes"), 1)
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(service.list_counters(&account).unwrap().len(), 1);
}

#[test]
fn counter_rename_keeps_values() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1]);
    let account = addr("google", "account");
    service
        .increment(&account, RecordId(1), &slug("requests"), 4)
        .unwrap();

    let def = service
        .update_counter(&account, &slug("requests"), Some("Calls"), None)
        .unwrap();
    assert_eq!(def.slug.as_str(), "calls");
    assert_eq!(
        service.get_value(&account, RecordId(1), &slug("calls")).unwrap(),
        4
    );
}

#[test]
fn ceiling_change_is_all_or_nothing() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1, 2]);
    let account = addr("google", "account");
    service
        .increment(&account, RecordId(2), &slug("requests"), 12)
        .unwrap();

    // Invalid ceiling blocks the rename that came with it
    let err = service
        .update_counter(&account, &slug("requests"), Some("Calls"), Some(10))
        .unwrap_err();
    assert!(err.is_validation());
    let counters = service.list_counters(&account).unwrap();
    assert_eq!(counters[0].slug.as_str(), "requests");
    assert_eq!(counters[0].max_value, 20);

    let def = service
        .update_counter(&account, &slug("requests"), None, Some(12))
        .unwrap();
    assert_eq!(def.max_value, 12);
}

#[test]
fn element_delete_purges_records() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1, 2, 3]);
    let account = addr("google", "account");

    service.delete_element(&account).unwrap();
    assert_eq!(service.store().record_count(&account).unwrap(), 0);
    assert!(service.list_elements(&slug("google")).unwrap().is_empty());

    let job = service.migration_jobs().pop().unwrap();
    assert_eq!(job.processed, 3);
    assert!(job.state.is_completed());
}
