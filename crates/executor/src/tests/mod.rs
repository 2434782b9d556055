//! Test modules for the executor crate.


use crate::{CeilingConfig, Command, Executor, Output};
use serde_json::json;

/// Executor with platform `google`, element `account` and a counter
/// `requests` capped at 20.
pub(crate) fn seeded_executor() -> Executor {
    let executor = Executor::open(CeilingConfig::default()).unwrap();
    let setup = vec![
        Command::PlatformCreate {
            name: "Google".into(),
        },
        Command::ElementCreate {
            platform: "google".into(),
            name: "Account".into(),
        },
        Command::CounterCreate {
            platform: "google".into(),
            element: "account".into(),
            name: "Requests".into(),
            max_value: 20,
        },
        Command::RecordCreate {
            platform: "google".into(),
            element: "account".into(),
            record: json!(42),
        },
    ];
    for result in executor.execute_many(setup) {
        assert!(matches!(
            result,
            Ok(Output::PlatformCreated(_)
                | Output::ElementCreated(_)
                | Output::CounterCreated(_)
                | Output::RecordCreated(_))
        ));
    }
    executor
}

/// Increment command on record 42 / `requests`
pub(crate) fn increment(delta: serde_json::Value) -> Command {
    Command::Increment {
        platform: "google".into(),
        element: "account".into(),
        record: json!(42),
        counter: "requests".into(),
        delta,
    }
}
