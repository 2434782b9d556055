//! The ceiling under contention.

use crate::common::*;
use proptest::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 50;

/// Hammer record 1 with unit increments; returns the accepted count.
fn hammer(service: &Arc<CounterService>) -> usize {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let service = Arc::clone(service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let account = addr("google", "account");
                let requests = slug("requests");
                barrier.wait();
                let mut accepted = 0;
                for _ in 0..PER_THREAD {
                    match service.increment(&account, RecordId(1), &requests, 1) {
                        Ok(_) => accepted += 1,
                        Err(CeilingError::CapacityExceeded { .. }) => {}
                        Err(e) => panic!("unexpected error: {:?}", e),
                    }
                }
                accepted
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).sum()
}

#[test]
fn atomic_mode_never_overshoots() {
    let service = seeded_service(config_with_mode(IncrementMode::Atomic), 100);
    seed_records(&service, [1]);

    let accepted = hammer(&service);
    assert_eq!(accepted, 100);
    let value = service
        .get_value(&addr("google", "account"), RecordId(1), &slug("requests"))
        .unwrap();
    assert_eq!(value, 100);
}

#[test]
fn checked_mode_value_matches_accepted_increments() {
    let service = seeded_service(config_with_mode(IncrementMode::Checked), 100);
    seed_records(&service, [1]);

    let accepted = hammer(&service);
    let value = service
        .get_value(&addr("google", "account"), RecordId(1), &slug("requests"))
        .unwrap();
    // Every accepted add lands; concurrent checks may jointly pass the ceiling
    assert_eq!(value, accepted as i64);
    assert!(accepted >= 100);
}

#[test]
fn distinct_records_do_not_interfere() {
    let service = seeded_service(config_with_mode(IncrementMode::Atomic), 1_000);
    seed_records(&service, 0..THREADS as i64);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let account = addr("google", "account");
                barrier.wait();
                for _ in 0..PER_THREAD {
                    service
                        .increment(&account, RecordId(i as i64), &slug("requests"), 2)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for record in service.list_records(&addr("google", "account")).unwrap() {
        assert_eq!(record.counters["requests"].value, (PER_THREAD * 2) as i64);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn accepted_increments_never_pass_the_ceiling(
        max in 1i64..200,
        deltas in prop::collection::vec(0i64..50, 1..40),
    ) {
        let service = seeded_service(CeilingConfig::default(), max);
        seed_records(&service, [1]);
        let account = addr("google", "account");
        let requests = slug("requests");

        let mut expected = 0i64;
        for delta in deltas {
            match service.increment(&account, RecordId(1), &requests, delta) {
                Ok(value) => {
                    expected += delta;
                    prop_assert_eq!(value, expected);
                }
                Err(CeilingError::CapacityExceeded { current, requested, max: ceiling, .. }) => {
                    prop_assert_eq!(current, expected);
                    prop_assert_eq!(requested, delta);
                    prop_assert!(current + requested > ceiling);
                }
                Err(e) => return Err(TestCaseError::fail(format!("{:?}", e))),
            }
            prop_assert!(expected <= max);
        }
        prop_assert_eq!(service.get_value(&account, RecordId(1), &requests).unwrap(), expected);
    }
}
