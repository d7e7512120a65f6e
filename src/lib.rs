//! # runopts
//!
//! Safe handle to an inference engine's native run configuration.
//!
//! A run configuration tells the engine how to log during a run, carries
//! free-form key/value settings, activates adapters, and is the channel
//! through which a running inference is asked to stop.
//!
//! ## Quick Start
//!
//! ```ignore
//! use runopts::prelude::*;
//!
//! let mut options = RunOptions::new(api)?;
//! options.set_log_severity_level(LoggingLevel::Verbose)?;
//! options.set_log_verbosity_level(3)?;
//! options.set_log_tag("request-17")?;
//! options.add_config_entry(config_keys::GPU_GRAPH_ID, "1")?;
//!
//! // Hand `options.native_ref()?` to the execution call.
//! // From any thread, while it runs:
//! options.set_terminate(true)?;
//! ```
//!
//! ## Guarantees
//!
//! - Getters return the last value the native layer accepted.
//! - The native resource is released exactly once, on [`RunOptions::release`]
//!   or on drop.
//! - A released handle fails every operation with [`Error::InvalidHandle`].
//!
//! ## Backends
//!
//! - [`FfiApi`] - the engine's C function table
//! - [`InMemoryApi`] - in-process state with call recording, for tests

#![warn(missing_docs)]

mod adapter;
mod config;
mod error;
mod run_options;
mod text;

pub mod prelude;

// Re-export main entry points
pub use adapter::LoraAdapter;
pub use config::{ConfigEntry, RunOptionsBuilder, RunOptionsConfig};
pub use error::{Error, Result};
pub use run_options::RunOptions;

// Re-export shared types and backends
pub use runopts_core::{config_keys, ErrorCode, LoggingLevel, NativeStatus};
pub use runopts_native::{ffi, memory, FfiApi, InMemoryApi, NativeApi};
