//! Mirror fidelity: getters return exactly the last accepted value.

use crate::setup;
use proptest::prelude::*;
use runopts::memory::Operation;
use runopts::prelude::*;
use runopts::{ErrorCode, NativeStatus};

#[derive(Debug, Clone)]
enum Mutation {
    Severity(LoggingLevel),
    Verbosity(u32),
    Tag(String),
    Terminate(bool),
}

fn level() -> impl Strategy<Value = LoggingLevel> {
    prop::sample::select(LoggingLevel::ALL.to_vec())
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        level().prop_map(Mutation::Severity),
        (0u32..=i32::MAX as u32).prop_map(Mutation::Verbosity),
        "[a-zA-Z0-9 _-]{0,24}".prop_map(Mutation::Tag),
        any::<bool>().prop_map(Mutation::Terminate),
    ]
}

proptest! {
    #[test]
    fn prop_getters_return_last_accepted_value(
        mutations in prop::collection::vec(mutation(), 0..40)
    ) {
        let api = InMemoryApi::new();
        let mut options = RunOptions::new(api.clone()).unwrap();

        let mut severity = LoggingLevel::Warning;
        let mut verbosity = 0u32;
        let mut tag = String::new();
        let mut terminate = false;

        for mutation in mutations {
            match mutation {
                Mutation::Severity(level) => {
                    options.set_log_severity_level(level).unwrap();
                    severity = level;
                }
                Mutation::Verbosity(level) => {
                    options.set_log_verbosity_level(level).unwrap();
                    verbosity = level;
                }
                Mutation::Tag(text) => {
                    options.set_log_tag(&text).unwrap();
                    tag = text;
                }
                Mutation::Terminate(value) => {
                    options.set_terminate(value).unwrap();
                    terminate = value;
                }
            }
        }

        prop_assert_eq!(options.log_severity_level().unwrap(), severity);
        prop_assert_eq!(options.log_verbosity_level().unwrap(), verbosity);
        prop_assert_eq!(options.log_tag().unwrap(), tag.as_str());
        prop_assert_eq!(options.is_terminate_requested().unwrap(), terminate);

        // The native side agrees with the mirror.
        let native = api.run_options(options.native_ref().unwrap()).unwrap();
        prop_assert_eq!(native.log_severity_level, severity);
        prop_assert_eq!(native.log_verbosity_level as u32, verbosity);
        prop_assert_eq!(native.run_tag, tag);
        prop_assert_eq!(native.terminate, terminate);
    }

    #[test]
    fn prop_rejected_update_keeps_previous_value(
        before in level(),
        after in level(),
    ) {
        let api = InMemoryApi::new();
        let mut options = RunOptions::new(api.clone()).unwrap();
        options.set_log_severity_level(before).unwrap();

        api.fail_next(
            Operation::SetLogSeverityLevel,
            NativeStatus::new(ErrorCode::RuntimeException, "rejected"),
        );
        prop_assert!(options.set_log_severity_level(after).is_err());
        prop_assert_eq!(options.log_severity_level().unwrap(), before);
    }
}

#[test]
fn test_rejections_surface_their_kind() {
    let api = setup();
    let mut options = RunOptions::new(api.clone()).unwrap();
    options.set_log_verbosity_level(4).unwrap();

    api.fail_next(
        Operation::SetLogVerbosityLevel,
        NativeStatus::invalid_argument("verbosity out of range"),
    );
    let err = options.set_log_verbosity_level(9).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(options.log_verbosity_level().unwrap(), 4);

    api.fail_next(
        Operation::SetLogVerbosityLevel,
        NativeStatus::new(ErrorCode::EngineError, "engine busy"),
    );
    let err = options.set_log_verbosity_level(9).unwrap_err();
    assert!(matches!(err, Error::NativeCall { operation: "set_log_verbosity_level", .. }));
    assert_eq!(options.log_verbosity_level().unwrap(), 4);

    // The handle remains usable after failures.
    options.set_log_verbosity_level(9).unwrap();
    assert_eq!(options.log_verbosity_level().unwrap(), 9);
}

#[test]
fn test_empty_tag_is_accepted() {
    let api = setup();
    let mut options = RunOptions::new(api.clone()).unwrap();
    options.set_log_tag("batch").unwrap();
    options.set_log_tag("").unwrap();
    assert_eq!(options.log_tag().unwrap(), "");
    assert_eq!(api.count(Operation::SetRunTag), 2);
}

#[test]
fn test_unicode_tag_roundtrips() {
    let api = setup();
    let mut options = RunOptions::new(api.clone()).unwrap();
    options.set_log_tag("推論-рабочий-🚀").unwrap();
    assert_eq!(options.log_tag().unwrap(), "推論-рабочий-🚀");
    let native = api.run_options(options.native_ref().unwrap()).unwrap();
    assert_eq!(native.run_tag, "推論-рабочий-🚀");
}
