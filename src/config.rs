//! Declarative run configuration.
//!
//! [`RunOptionsConfig`] is a plain, serde-friendly description of a run
//! configuration. [`RunOptionsBuilder`] assembles one fluently and
//! materialises it into a [`RunOptions`] handle.
//!
//! ```ignore
//! use runopts::prelude::*;
//!
//! let options = RunOptionsBuilder::new()
//!     .log_severity_level(LoggingLevel::Verbose)
//!     .log_verbosity_level(2)
//!     .log_tag("nightly-eval")
//!     .config_entry(config_keys::DISABLE_SYNCHRONIZE_EXECUTION_PROVIDERS, "1")
//!     .build(api)?;
//! ```

use crate::error::Result;
use crate::run_options::RunOptions;
use runopts_core::LoggingLevel;
use runopts_native::NativeApi;
use serde::{Deserialize, Serialize};

/// One key/value configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Entry key
    pub key: String,
    /// Entry value
    pub value: String,
}

/// Description of a run configuration.
///
/// Missing fields take the engine defaults when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptionsConfig {
    /// Log severity level
    pub log_severity_level: LoggingLevel,
    /// Log verbosity level (honoured at `Verbose` only)
    pub log_verbosity_level: u32,
    /// Log tag
    pub log_tag: String,
    /// Configuration entries, forwarded in order
    pub config_entries: Vec<ConfigEntry>,
}

impl RunOptionsConfig {
    /// Configuration with engine defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialise into a handle.
    pub fn build<'a, A: NativeApi>(&self, api: A) -> Result<RunOptions<'a, A>> {
        RunOptions::from_config(api, self)
    }
}

/// Builder for [`RunOptions`].
#[derive(Debug, Clone, Default)]
pub struct RunOptionsBuilder {
    config: RunOptionsConfig,
}

impl RunOptionsBuilder {
    /// Create a builder with engine defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log severity level.
    pub fn log_severity_level(mut self, level: LoggingLevel) -> Self {
        self.config.log_severity_level = level;
        self
    }

    /// Set the log verbosity level.
    pub fn log_verbosity_level(mut self, level: u32) -> Self {
        self.config.log_verbosity_level = level;
        self
    }

    /// Set the log tag.
    pub fn log_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.log_tag = tag.into();
        self
    }

    /// Append a configuration entry.
    pub fn config_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.config_entries.push(ConfigEntry {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Finish without allocating anything.
    pub fn into_config(self) -> RunOptionsConfig {
        self.config
    }

    /// Allocate a handle and apply the configuration.
    pub fn build<'a, A: NativeApi>(self, api: A) -> Result<RunOptions<'a, A>> {
        RunOptions::from_config(api, &self.config)
    }
}
