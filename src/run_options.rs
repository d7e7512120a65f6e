//! The run-configuration handle.
//!
//! [`RunOptions`] owns one native run configuration. Mirrored fields
//! (severity, verbosity, tag, terminate) are committed locally only after the
//! native layer accepted the write, so the mirror never diverges from the
//! native state. Configuration entries and adapters are forwarded and not
//! cached.
//!
//! # Thread Safety
//!
//! `RunOptions` is `Send` and `Sync`. Every mutator except
//! [`RunOptions::set_terminate`] takes `&mut self`, so it cannot race with an
//! execution that borrows the handle. `set_terminate` takes `&self` and may be
//! called from another thread while a run is in flight.
//!
//! # Drop Behavior
//!
//! The native configuration is released on drop unless [`RunOptions::release`]
//! already did so. Release never fails and never panics.

use crate::adapter::LoraAdapter;
use crate::config::RunOptionsConfig;
use crate::error::{Error, Result};
use crate::text::to_c_string;
use parking_lot::Mutex;
use runopts_core::{LoggingLevel, NativeStatus};
use runopts_native::NativeApi;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace};

const RESOURCE: &str = "run options";

/// Owning handle to a native run configuration.
///
/// The lifetime `'a` bounds the adapters activated on this configuration:
/// every [`LoraAdapter`] passed to [`RunOptions::add_active_adapter`] must
/// outlive the handle. The handle never releases those adapters.
///
/// # Example
///
/// ```ignore
/// use runopts::prelude::*;
///
/// let api = InMemoryApi::new();
/// let mut options = RunOptions::new(api)?;
/// options.set_log_severity_level(LoggingLevel::Verbose)?;
/// options.set_log_verbosity_level(3)?;
/// options.add_config_entry(config_keys::GPU_GRAPH_ID, "1")?;
///
/// // From a watchdog thread:
/// options.set_terminate(true)?;
/// ```
pub struct RunOptions<'a, A: NativeApi> {
    api: A,
    /// `None` once released.
    raw: Option<A::RunOptions>,
    log_severity_level: LoggingLevel,
    log_verbosity_level: u32,
    log_tag: String,
    /// Last terminate value confirmed by the native layer.
    terminate: Mutex<bool>,
    active_adapters: Vec<A::Adapter>,
    _adapters: PhantomData<&'a ()>,
}

impl<'a, A: NativeApi> RunOptions<'a, A> {
    /// Allocate a native run configuration with engine defaults.
    ///
    /// # Errors
    ///
    /// * `Error::ResourceAllocation` - the native layer could not allocate
    pub fn new(api: A) -> Result<Self> {
        let raw = api
            .create_run_options()
            .map_err(|status| Error::ResourceAllocation {
                resource: RESOURCE,
                status,
            })?;
        debug!(native_ref = ?raw, "created run options");

        Ok(Self {
            api,
            raw: Some(raw),
            log_severity_level: LoggingLevel::Warning,
            log_verbosity_level: 0,
            log_tag: String::new(),
            terminate: Mutex::new(false),
            active_adapters: Vec::new(),
            _adapters: PhantomData,
        })
    }

    /// Allocate a handle and apply `config` to it.
    ///
    /// If any part of the configuration is rejected the handle is released
    /// and the error returned.
    pub fn from_config(api: A, config: &RunOptionsConfig) -> Result<Self> {
        let mut options = Self::new(api)?;
        options.apply_config(config)?;
        Ok(options)
    }

    /// Apply `config` on top of the current state.
    ///
    /// Mirrored fields are only forwarded when they differ from the current
    /// mirror. Configuration entries are always forwarded, in order.
    pub fn apply_config(&mut self, config: &RunOptionsConfig) -> Result<()> {
        if config.log_severity_level != self.log_severity_level()? {
            self.set_log_severity_level(config.log_severity_level)?;
        }
        if config.log_verbosity_level != self.log_verbosity_level()? {
            self.set_log_verbosity_level(config.log_verbosity_level)?;
        }
        if config.log_tag != self.log_tag()? {
            self.set_log_tag(&config.log_tag)?;
        }
        for entry in &config.config_entries {
            self.add_config_entry(&entry.key, &entry.value)?;
        }
        Ok(())
    }

    /// Whether the handle still owns its native configuration.
    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// Native reference, for passing into an execution call.
    pub fn native_ref(&self) -> Result<A::RunOptions> {
        self.raw.ok_or(Error::InvalidHandle(RESOURCE))
    }

    /// The native API this handle forwards to.
    pub fn api(&self) -> &A {
        &self.api
    }

    fn native_error(&self, operation: &'static str, status: NativeStatus) -> Error {
        let err = Error::from_native(operation, status);
        debug!(operation, error = %err, "native layer rejected run options update");
        err
    }

    // ========================================================================
    // Mirrored fields
    // ========================================================================

    /// Log severity level. Default: `Warning`.
    pub fn log_severity_level(&self) -> Result<LoggingLevel> {
        self.native_ref()?;
        Ok(self.log_severity_level)
    }

    /// Set the log severity level.
    pub fn set_log_severity_level(&mut self, level: LoggingLevel) -> Result<()> {
        let raw = self.native_ref()?;
        trace!(native_ref = ?raw, %level, "set log severity level");
        self.api
            .set_log_severity_level(raw, level)
            .map_err(|status| self.native_error("set_log_severity_level", status))?;
        self.log_severity_level = level;
        Ok(())
    }

    /// Log verbosity level. Default: 0.
    ///
    /// Only honoured by the engine when the severity is `Verbose`.
    pub fn log_verbosity_level(&self) -> Result<u32> {
        self.native_ref()?;
        Ok(self.log_verbosity_level)
    }

    /// Set the log verbosity level.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidArgument` - `level` does not fit the native integer,
    ///   or the native layer rejected it
    pub fn set_log_verbosity_level(&mut self, level: u32) -> Result<()> {
        let raw = self.native_ref()?;
        let native_level = i32::try_from(level).map_err(|_| {
            Error::invalid_argument(format!(
                "log verbosity level {} exceeds {}",
                level,
                i32::MAX
            ))
        })?;
        trace!(native_ref = ?raw, level, "set log verbosity level");
        self.api
            .set_log_verbosity_level(raw, native_level)
            .map_err(|status| self.native_error("set_log_verbosity_level", status))?;
        self.log_verbosity_level = level;
        if !self.log_severity_level.honours_verbosity() {
            debug!(
                native_ref = ?raw,
                level,
                severity = %self.log_severity_level,
                "verbosity has no effect until severity is verbose"
            );
        }
        Ok(())
    }

    /// Tag attached to log lines of runs using this configuration. Default: empty.
    pub fn log_tag(&self) -> Result<&str> {
        self.native_ref()?;
        Ok(&self.log_tag)
    }

    /// Set the log tag.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidArgument` - `tag` contains a NUL byte (no native call
    ///   is made), or the native layer rejected it
    pub fn set_log_tag(&mut self, tag: &str) -> Result<()> {
        let raw = self.native_ref()?;
        let c_tag = to_c_string("log tag", tag)?;
        trace!(native_ref = ?raw, tag, "set log tag");
        self.api
            .set_run_tag(raw, &c_tag)
            .map_err(|status| self.native_error("set_run_tag", status))?;
        self.log_tag = tag.to_owned();
        Ok(())
    }

    /// Whether runs using this configuration have been asked to abort.
    pub fn is_terminate_requested(&self) -> Result<bool> {
        self.native_ref()?;
        Ok(*self.terminate.lock())
    }

    /// Request (`true`) or clear (`false`) cooperative termination.
    ///
    /// Edge-triggered: asking for the value already held makes no native call.
    /// Safe to call from any thread while a run borrows this handle; this is
    /// how deadlines are implemented by callers.
    pub fn set_terminate(&self, terminate: bool) -> Result<()> {
        let raw = self.native_ref()?;
        let mut current = self.terminate.lock();
        if *current == terminate {
            return Ok(());
        }

        trace!(native_ref = ?raw, terminate, "set terminate");
        let (operation, result) = if terminate {
            ("set_terminate", self.api.set_terminate(raw))
        } else {
            ("unset_terminate", self.api.unset_terminate(raw))
        };
        result.map_err(|status| self.native_error(operation, status))?;
        *current = terminate;
        Ok(())
    }

    // ========================================================================
    // Forwarded state
    // ========================================================================

    /// Add a configuration entry.
    ///
    /// Forwarded immediately; a later entry for the same key wins. Nothing is
    /// cached locally.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidArgument` - key or value contains a NUL byte, or the
    ///   native layer rejected the pair
    /// * `Error::NativeCall` - any other native failure
    pub fn add_config_entry(&mut self, key: &str, value: &str) -> Result<()> {
        let raw = self.native_ref()?;
        let c_key = to_c_string("config key", key)?;
        let c_value = to_c_string("config value", value)?;
        trace!(native_ref = ?raw, key, value, "add config entry");
        self.api
            .add_config_entry(raw, &c_key, &c_value)
            .map_err(|status| {
                let err = Error::from_native("add_config_entry", status);
                debug!(key, error = %err, "config entry rejected");
                err
            })
    }

    /// Activate `adapter` for every run using this configuration.
    ///
    /// The configuration keeps a non-owning reference; the borrow guarantees
    /// the adapter outlives the handle.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidArgument` - the adapter was released, or the native
    ///   layer rejected it
    /// * `Error::NativeCall` - any other native failure
    pub fn add_active_adapter(&mut self, adapter: &'a LoraAdapter<A>) -> Result<()> {
        let raw = self.native_ref()?;
        let adapter_ref = adapter
            .native_ref()
            .map_err(|_| Error::invalid_argument("adapter has been released"))?;
        trace!(native_ref = ?raw, adapter = ?adapter_ref, "add active adapter");
        self.api
            .add_active_adapter(raw, adapter_ref)
            .map_err(|status| {
                let err = Error::from_native("add_active_adapter", status);
                debug!(adapter = ?adapter_ref, error = %err, "adapter rejected");
                err
            })?;
        self.active_adapters.push(adapter_ref);
        Ok(())
    }

    /// Number of adapters activated on this configuration.
    pub fn active_adapter_count(&self) -> Result<usize> {
        self.native_ref()?;
        Ok(self.active_adapters.len())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Release the native configuration.
    ///
    /// Idempotent: the native release runs once, later calls do nothing.
    /// Afterwards every other operation fails with `Error::InvalidHandle`.
    pub fn release(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.api.release_run_options(raw);
            self.active_adapters.clear();
            debug!(native_ref = ?raw, "released run options");
        }
    }
}

impl<A: NativeApi> Drop for RunOptions<'_, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<A: NativeApi> fmt::Debug for RunOptions<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("native_ref", &self.raw)
            .field("log_severity_level", &self.log_severity_level)
            .field("log_verbosity_level", &self.log_verbosity_level)
            .field("log_tag", &self.log_tag)
            .field("terminate", &*self.terminate.lock())
            .field("active_adapters", &self.active_adapters.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
