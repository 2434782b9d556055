//! Bounded increments as seen by a client.

use crate::common::*;
use serde_json::json;

fn seeded() -> Executor {
    let executor = executor();
    for line in [
        json!({"PlatformCreate": {"name": "Google"}}),
        json!({"ElementCreate": {"platform": "google", "name": "Account"}}),
        json!({"CounterCreate": {"platform": "google", "element": "account", "name": "Requests", "max_value": 20}}),
        json!({"RecordCreate": {"platform": "google", "element": "account", "record": 42}}),
    ] {
        let response = send(&executor, line.clone());
        assert_eq!(response.status, 201, "{} -> {:?}", line, response);
    }
    executor
}

fn increment(executor: &Executor, delta: serde_json::Value) -> Response {
    send(
        executor,
        json!({"Increment": {"platform": "google", "element": "account",
                             "record": 42, "counter": "requests", "delta": delta}}),
    )
}

#[test]
fn increments_stop_at_the_ceiling() {
    let executor = seeded();

    let first = increment(&executor, json!(18));
    assert_eq!(first.status, 200);
    assert_eq!(first.body, json!({"Value": 18}));

    let rejected = increment(&executor, json!(5));
    assert_eq!(rejected.status, 440);
    let detail = &rejected.body["error"]["CapacityExceeded"];
    assert_eq!(detail["current"], 18);
    assert_eq!(detail["requested"], 5);
    assert_eq!(detail["max"], 20);

    let last = increment(&executor, json!(2));
    assert_eq!(last.status, 200);
    assert_eq!(last.body, json!({"Value": 20}));

    let read = send(
        &executor,
        json!({"ValueGet": {"platform": "google", "element": "account",
                            "record": 42, "counter": "requests"}}),
    );
    assert_eq!(read.body, json!({"Value": 20}));
}

#[test]
fn zero_delta_at_the_ceiling_is_accepted() {
    let executor = seeded();
    assert_eq!(increment(&executor, json!(20)).status, 200);
    let response = increment(&executor, json!(0));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"Value": 20}));
}

#[test]
fn bad_deltas_are_rejected_before_lookup() {
    let executor = seeded();
    for delta in [json!(-1), json!("abc"), json!(1.5), json!(null)] {
        let response = increment(&executor, delta.clone());
        assert_eq!(response.status, 400, "delta {}", delta);
    }
    // Nothing was applied
    assert_eq!(increment(&executor, json!(0)).body, json!({"Value": 0}));
}

#[test]
fn numeric_string_ids_and_deltas_are_accepted() {
    let executor = seeded();
    let response = send(
        &executor,
        json!({"Increment": {"platform": "google", "element": "account",
                             "record": "42", "counter": "requests", "delta": "3"}}),
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"Value": 3}));
}

#[test]
fn unknown_counter_or_record_is_not_found() {
    let executor = seeded();
    let response = send(
        &executor,
        json!({"Increment": {"platform": "google", "element": "account",
                             "record": 42, "counter": "writes", "delta": 1}}),
    );
    assert_eq!(response.status, 441);

    let response = send(
        &executor,
        json!({"Increment": {"platform": "google", "element": "account",
                             "record": 7, "counter": "requests", "delta": 1}}),
    );
    assert_eq!(response.status, 441);
}

#[test]
fn lowering_the_ceiling_below_a_value_is_refused() {
    let executor = seeded();
    assert_eq!(increment(&executor, json!(15)).status, 200);

    let refused = send(
        &executor,
        json!({"CounterUpdate": {"platform": "google", "element": "account",
                                 "counter": "requests", "max_value": 10}}),
    );
    assert_eq!(refused.status, 400);
    assert!(refused.body["message"]
        .as_str()
        .unwrap()
        .contains("record 42 holds 15"));

    let accepted = send(
        &executor,
        json!({"CounterUpdate": {"platform": "google", "element": "account",
                                 "counter": "requests", "max_value": 15}}),
    );
    assert_eq!(accepted.status, 200);
    assert_eq!(accepted.body["Counter"]["max_value"], 15);
    assert_eq!(increment(&executor, json!(1)).status, 440);
}
