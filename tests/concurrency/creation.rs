//! Racing creates of the same record.

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn one_create_wins_per_record() {
    const THREADS: usize = 8;
    let service = seeded_service(CeilingConfig::default(), 10);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                service.create_record(&addr("google", "account"), RecordId(5))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert!(matches!(err, CeilingError::AlreadyExists { .. }), "{:?}", err);
    }
}

#[test]
fn increments_racing_a_delete_see_a_missing_record() {
    let service = seeded_service(CeilingConfig::default(), 1_000);
    seed_records(&service, [1]);
    let barrier = Arc::new(Barrier::new(2));

    let incrementer = {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..200 {
                match service.increment(&addr("google", "account"), RecordId(1), &slug("requests"), 1) {
                    Ok(_) => {}
                    Err(e) => {
                        assert!(e.is_not_found(), "{:?}", e);
                        return;
                    }
                }
            }
        })
    };
    barrier.wait();
    service
        .delete_record(&addr("google", "account"), RecordId(1))
        .unwrap();
    incrementer.join().unwrap();

    assert!(service
        .get_record(&addr("google", "account"), RecordId(1))
        .unwrap_err()
        .is_not_found());
}
