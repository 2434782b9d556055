//! Record lifecycle through the command boundary.

use crate::common::*;
use serde_json::json;

fn with_counters() -> Executor {
    let executor = executor();
    send(&executor, json!({"PlatformCreate": {"name": "Google"}}));
    send(
        &executor,
        json!({"ElementCreate": {"platform": "google", "name": "Account"}}),
    );
    for (name, max) in [("Requests", 20), ("Writes", 5)] {
        let response = send(
            &executor,
            json!({"CounterCreate": {"platform": "google", "element": "account",
                                     "name": name, "max_value": max}}),
        );
        assert_eq!(response.status, 201);
    }
    executor
}

#[test]
fn new_records_start_at_zero_for_every_counter() {
    let executor = with_counters();
    let response = send(
        &executor,
        json!({"RecordCreate": {"platform": "google", "element": "account", "record": 1}}),
    );
    assert_eq!(response.status, 201);
    let view = &response.body["RecordCreated"];
    assert_eq!(view["id"], 1);
    assert_eq!(view["counters"]["requests"], json!({"value": 0, "max": 20}));
    assert_eq!(view["counters"]["writes"], json!({"value": 0, "max": 5}));
}

#[test]
fn duplicate_record_is_already_exists() {
    let executor = with_counters();
    let create = json!({"RecordCreate": {"platform": "google", "element": "account", "record": 1}});
    assert_eq!(send(&executor, create.clone()).status, 201);
    let again = send(&executor, create);
    assert_eq!(again.status, 442);
    assert!(again.body["error"]["AlreadyExists"].is_object());
}

#[test]
fn records_list_in_id_order() {
    let executor = with_counters();
    for id in [30, 10, 20] {
        send(
            &executor,
            json!({"RecordCreate": {"platform": "google", "element": "account", "record": id}}),
        );
    }
    let response = send(
        &executor,
        json!({"RecordList": {"platform": "google", "element": "account"}}),
    );
    assert_eq!(response.status, 200);
    let ids: Vec<i64> = response.body["Records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[test]
fn delete_record_is_no_content_then_not_found() {
    let executor = with_counters();
    send(
        &executor,
        json!({"RecordCreate": {"platform": "google", "element": "account", "record": 1}}),
    );
    let delete = json!({"RecordDelete": {"platform": "google", "element": "account", "record": 1}});
    let response = send(&executor, delete.clone());
    assert_eq!(response.status, 204);
    assert!(response.body.is_null());
    assert_eq!(send(&executor, delete).status, 441);
}

#[test]
fn record_in_unknown_element_is_not_found() {
    let executor = with_counters();
    let response = send(
        &executor,
        json!({"RecordCreate": {"platform": "google", "element": "billing", "record": 1}}),
    );
    assert_eq!(response.status, 441);
}
