//! Catalog CRUD through the command boundary.

use crate::common::*;
use serde_json::json;

#[test]
fn duplicate_names_and_similar_slugs_are_rejected() {
    let executor = executor();
    assert_eq!(
        send(&executor, json!({"PlatformCreate": {"name": "Google"}})).status,
        201
    );

    let same = send(&executor, json!({"PlatformCreate": {"name": "Google"}}));
    assert_eq!(same.status, 400);
    assert!(same.body["message"].as_str().unwrap().contains("already exists"));

    let similar = send(&executor, json!({"PlatformCreate": {"name": "GOOGLE"}}));
    assert_eq!(similar.status, 400);
    assert!(similar.body["message"]
        .as_str()
        .unwrap()
        .contains("similar name"));
}

#[test]
fn empty_or_reserved_names_are_rejected() {
    let executor = executor();
    for name in ["", "   ", "!!!", "platforms"] {
        let response = send(&executor, json!({"PlatformCreate": {"name": name}}));
        assert_eq!(response.status, 400, "name {:?}", name);
    }
}

#[test]
fn counter_ceiling_must_be_positive() {
    let executor = executor();
    send(&executor, json!({"PlatformCreate": {"name": "Google"}}));
    send(
        &executor,
        json!({"ElementCreate": {"platform": "google", "name": "Account"}}),
    );
    for max in [0, -5] {
        let response = send(
            &executor,
            json!({"CounterCreate": {"platform": "google", "element": "account",
                                     "name": "Requests", "max_value": max}}),
        );
        assert_eq!(response.status, 400, "max_value {}", max);
    }
}

#[test]
fn platform_delete_cascades() {
    let executor = executor();
    send(&executor, json!({"PlatformCreate": {"name": "Google"}}));
    send(
        &executor,
        json!({"ElementCreate": {"platform": "google", "name": "Account"}}),
    );
    send(
        &executor,
        json!({"RecordCreate": {"platform": "google", "element": "account", "record": 1}}),
    );

    let response = send(&executor, json!({"PlatformDelete": {"platform": "google"}}));
    assert_eq!(response.status, 204);

    let platforms = send(&executor, json!("PlatformList"));
    assert_eq!(platforms.body, json!({"Platforms": []}));
    let records = send(
        &executor,
        json!({"RecordList": {"platform": "google", "element": "account"}}),
    );
    assert_eq!(records.status, 441);

    // The name is free again and the new platform starts empty
    assert_eq!(
        send(&executor, json!({"PlatformCreate": {"name": "Google"}})).status,
        201
    );
    send(
        &executor,
        json!({"ElementCreate": {"platform": "google", "name": "Account"}}),
    );
    let records = send(
        &executor,
        json!({"RecordList": {"platform": "google", "element": "account"}}),
    );
    assert_eq!(records.body, json!({"Records": []}));
}

#[test]
fn unknown_fields_are_rejected() {
    let executor = executor();
    let response = send(
        &executor,
        json!({"PlatformCreate": {"name": "Google", "owner": "me"}}),
    );
    assert_eq!(response.status, 400);
    assert!(response.body["error"]["Serialization"].is_object());
}

#[test]
fn ping_reports_version() {
    let executor = executor();
    let response = send(&executor, json!("Ping"));
    assert_eq!(response.status, 200);
    assert!(response.body["Pong"]["version"].is_string());
}
