//! End-to-end walkthrough of a configuration's life.

use crate::setup;
use runopts::memory::{NativeCall, Operation};
use runopts::prelude::*;

#[test]
fn test_configure_signal_release() {
    let api = setup();

    // construct
    let mut options = RunOptions::new(api.clone()).unwrap();
    let id = options.native_ref().unwrap();

    // severity + verbosity, read back
    options.set_log_severity_level(LoggingLevel::Verbose).unwrap();
    options.set_log_verbosity_level(3).unwrap();
    assert_eq!(
        (
            options.log_severity_level().unwrap(),
            options.log_verbosity_level().unwrap()
        ),
        (LoggingLevel::Verbose, 3)
    );

    // duplicate key: two ordered native calls
    options.add_config_entry("key1", "v1").unwrap();
    options.add_config_entry("key1", "v2").unwrap();
    let entries: Vec<NativeCall> = api
        .calls()
        .into_iter()
        .filter(|call| call.operation() == Operation::AddConfigEntry)
        .collect();
    assert_eq!(
        entries,
        vec![
            NativeCall::AddConfigEntry {
                options: id,
                key: "key1".into(),
                value: "v1".into(),
            },
            NativeCall::AddConfigEntry {
                options: id,
                key: "key1".into(),
                value: "v2".into(),
            },
        ]
    );

    // terminate: one native set
    options.set_terminate(true).unwrap();
    assert_eq!(api.count(Operation::SetTerminate), 1);

    // release: getters now fail
    options.release();
    assert!(options.log_severity_level().unwrap_err().is_invalid_handle());
    assert_eq!(api.live_run_options(), 0);
}

#[test]
fn test_builder_to_execution_handoff() {
    let api = setup();
    let options = RunOptionsBuilder::new()
        .log_severity_level(LoggingLevel::Info)
        .log_tag("eval-run")
        .config_entry(config_keys::DISABLE_SYNCHRONIZE_EXECUTION_PROVIDERS, "1")
        .build(api.clone())
        .unwrap();

    // An execution collaborator receives the native reference.
    let native = api.run_options(options.native_ref().unwrap()).unwrap();
    assert_eq!(native.log_severity_level, LoggingLevel::Info);
    assert_eq!(native.run_tag, "eval-run");
    assert_eq!(
        native.config_entries[config_keys::DISABLE_SYNCHRONIZE_EXECUTION_PROVIDERS],
        "1"
    );
}
