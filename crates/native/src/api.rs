//! The native primitives a run configuration is built on.

use runopts_core::{LoggingLevel, NativeResult};
use std::ffi::CStr;
use std::fmt::Debug;

/// Native run-configuration API.
///
/// Each method is a direct, blocking forward to the engine. References are
/// opaque: callers may copy and compare them but never look inside.
///
/// # Contract
///
/// - `release_*` never fails observably and is called at most once per
///   reference by the owning handle.
/// - `set_terminate` may be invoked from any thread while an execution that
///   uses the same reference is in flight.
/// - Text arguments are NUL-terminated UTF-8.
pub trait NativeApi: Send + Sync {
    /// Opaque reference to a native run configuration
    type RunOptions: Copy + Eq + Debug + Send + Sync;

    /// Opaque reference to a native adapter
    type Adapter: Copy + Eq + Debug + Send + Sync;

    /// Allocate a run configuration with engine defaults
    fn create_run_options(&self) -> NativeResult<Self::RunOptions>;

    /// Release a run configuration
    fn release_run_options(&self, options: Self::RunOptions);

    /// Set the log severity filter
    fn set_log_severity_level(
        &self,
        options: Self::RunOptions,
        level: LoggingLevel,
    ) -> NativeResult<()>;

    /// Set the verbose-logging level
    fn set_log_verbosity_level(&self, options: Self::RunOptions, level: i32) -> NativeResult<()>;

    /// Set the tag attached to log lines of the run
    fn set_run_tag(&self, options: Self::RunOptions, tag: &CStr) -> NativeResult<()>;

    /// Ask every execution using `options` to abort
    fn set_terminate(&self, options: Self::RunOptions) -> NativeResult<()>;

    /// Clear the abort request for subsequent executions
    fn unset_terminate(&self, options: Self::RunOptions) -> NativeResult<()>;

    /// Add a key/value configuration entry; later entries win
    fn add_config_entry(
        &self,
        options: Self::RunOptions,
        key: &CStr,
        value: &CStr,
    ) -> NativeResult<()>;

    /// Append a non-owning adapter reference to the active list
    fn add_active_adapter(
        &self,
        options: Self::RunOptions,
        adapter: Self::Adapter,
    ) -> NativeResult<()>;

    /// Load an adapter from a file
    fn create_adapter(&self, path: &CStr) -> NativeResult<Self::Adapter>;

    /// Load an adapter from an in-memory buffer
    fn create_adapter_from_bytes(&self, bytes: &[u8]) -> NativeResult<Self::Adapter>;

    /// Release an adapter
    fn release_adapter(&self, adapter: Self::Adapter);
}
