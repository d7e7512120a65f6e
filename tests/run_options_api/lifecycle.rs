//! Handle lifecycle: usable -> released.

use crate::setup;
use runopts::memory::{NativeCall, Operation};
use runopts::prelude::*;
use runopts::NativeStatus;
use std::panic::AssertUnwindSafe;

#[test]
fn test_new_handle_is_valid() {
    let api = setup();
    let options = RunOptions::new(api.clone()).unwrap();
    assert!(options.is_valid());
    assert!(options.native_ref().is_ok());
    assert_eq!(api.live_run_options(), 1);
}

#[test]
fn test_each_handle_owns_its_own_resource() {
    let api = setup();
    let first = RunOptions::new(api.clone()).unwrap();
    let second = RunOptions::new(api.clone()).unwrap();
    assert_ne!(first.native_ref().unwrap(), second.native_ref().unwrap());

    drop(first);
    assert_eq!(api.live_run_options(), 1);
    assert!(second.is_valid());
}

#[test]
fn test_release_many_times_releases_once() {
    let api = setup();
    let mut options = RunOptions::new(api.clone()).unwrap();
    for _ in 0..5 {
        options.release();
    }
    drop(options);

    assert_eq!(api.count(Operation::ReleaseRunOptions), 1);
    assert_eq!(api.stray_releases(), 0);
}

#[test]
fn test_every_operation_fails_after_release() {
    let api = setup();
    let adapter = LoraAdapter::from_bytes(api.clone(), b"weights").unwrap();
    let mut options = RunOptions::new(api.clone()).unwrap();
    options.release();

    let results: Vec<Error> = vec![
        options.log_severity_level().unwrap_err(),
        options.log_verbosity_level().unwrap_err(),
        options.log_tag().unwrap_err(),
        options.is_terminate_requested().unwrap_err(),
        options.active_adapter_count().unwrap_err(),
        options.native_ref().unwrap_err(),
        options.set_log_severity_level(LoggingLevel::Info).unwrap_err(),
        options.set_log_verbosity_level(2).unwrap_err(),
        options.set_log_tag("tag").unwrap_err(),
        options.set_terminate(true).unwrap_err(),
        options.set_terminate(false).unwrap_err(),
        options.add_config_entry("key", "value").unwrap_err(),
        options.add_active_adapter(&adapter).unwrap_err(),
        options.apply_config(&RunOptionsConfig::new()).unwrap_err(),
    ];
    for err in results {
        assert!(err.is_invalid_handle(), "expected InvalidHandle, got {:?}", err);
    }
}

#[test]
fn test_allocation_failure_produces_no_handle() {
    let api = setup();
    api.fail_next(Operation::CreateRunOptions, NativeStatus::fail("no memory"));

    let err = RunOptions::new(api.clone()).unwrap_err();
    assert!(err.is_allocation_failure());
    assert!(matches!(
        err,
        Error::ResourceAllocation {
            resource: "run options",
            ..
        }
    ));

    // Nothing was allocated, so nothing is released.
    assert_eq!(api.calls(), vec![NativeCall::CreateRunOptions]);
    assert_eq!(api.live_run_options(), 0);

    // The backend itself is fine afterwards.
    assert!(RunOptions::new(api.clone()).is_ok());
}

#[test]
fn test_release_during_unwind() {
    let api = setup();
    let observer = api.clone();

    let outcome = std::panic::catch_unwind(AssertUnwindSafe(move || {
        let _options = RunOptions::new(api).unwrap();
        panic!("execution failed");
    }));

    assert!(outcome.is_err());
    assert_eq!(observer.live_run_options(), 0);
    assert_eq!(observer.count(Operation::ReleaseRunOptions), 1);
}

#[test]
fn test_handle_moves_across_threads() {
    let api = setup();
    let mut options = RunOptions::new(api.clone()).unwrap();
    options.set_log_tag("worker").unwrap();

    let options = std::thread::spawn(move || {
        assert_eq!(options.log_tag().unwrap(), "worker");
        options
    })
    .join()
    .unwrap();

    drop(options);
    assert_eq!(api.live_run_options(), 0);
}
