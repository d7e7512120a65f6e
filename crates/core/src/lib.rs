//! Core types shared by the runopts crates.
//!
//! This crate defines the vocabulary both sides of the native boundary agree
//! on: the logging level enumeration, the native error codes and status type,
//! and the well-known run configuration keys.

pub mod config_keys;
pub mod level;
pub mod status;

pub use level::LoggingLevel;
pub use status::{ErrorCode, NativeResult, NativeStatus};
