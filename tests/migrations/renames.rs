//! Renames relocate records and keep their values.

use crate::common::*;

#[test]
fn element_rename_moves_records_with_values() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1, 2, 3]);
    let account = addr("google", "account");
    service
        .increment(&account, RecordId(2), &slug("requests"), 7)
        .unwrap();

    let renamed = service.rename_element(&account, "Billing").unwrap();
    assert_eq!(renamed.slug.as_str(), "billing");

    let billing = addr("google", "billing");
    let ids: Vec<i64> = service
        .list_records(&billing)
        .unwrap()
        .iter()
        .map(|r| r.id.as_i64())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(
        service
            .get_value(&billing, RecordId(2), &slug("requests"))
            .unwrap(),
        7
    );
    assert!(service.store().addresses().unwrap().iter().all(|a| *a != account));

    // The old address no longer resolves
    assert!(service.list_records(&account).unwrap_err().is_not_found());

    let jobs = service.migration_jobs();
    let last = jobs.last().unwrap();
    assert_eq!(last.state, JobState::Completed);
    assert_eq!(last.processed, 3);
}

#[test]
fn platform_rename_moves_every_element() {
    let service = seeded_service(CeilingConfig::default(), 20);
    service.create_element(&slug("google"), "Billing").unwrap();
    seed_records(&service, [1, 2]);
    service
        .create_record(&addr("google", "billing"), RecordId(9))
        .unwrap();

    let renamed = service.rename_platform(&slug("google"), "Alphabet").unwrap();
    assert_eq!(renamed.slug.as_str(), "alphabet");

    assert_eq!(
        service.list_records(&addr("alphabet", "account")).unwrap().len(),
        2
    );
    assert_eq!(
        service.list_records(&addr("alphabet", "billing")).unwrap().len(),
        1
    );
    assert!(service
        .store()
        .addresses()
        .unwrap()
        .iter()
        .all(|a| a.platform.as_str() == "alphabet"));
}

#[test]
fn rename_to_same_slug_keeps_records_in_place() {
    let service = seeded_service(CeilingConfig::default(), 20);
    seed_records(&service, [1]);
    let jobs_before = service.migration_jobs().len();

    let renamed = service
        .rename_element(&addr("google", "account"), "ACCOUNT")
        .unwrap();
    assert_eq!(renamed.name, "ACCOUNT");
    assert_eq!(renamed.slug.as_str(), "account");
    assert_eq!(service.migration_jobs().len(), jobs_before);
    assert_eq!(
        service.list_records(&addr("google", "account")).unwrap().len(),
        1
    );
}

#[test]
fn rename_onto_sibling_is_rejected() {
    let service = seeded_service(CeilingConfig::default(), 20);
    service.create_element(&slug("google"), "Billing").unwrap();
    let err = service
        .rename_element(&addr("google", "account"), "billing")
        .unwrap_err();
    assert!(err.is_validation());
}
