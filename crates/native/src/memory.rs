//! In-memory native backend
//!
//! [`InMemoryApi`] keeps the native side of every run configuration and
//! adapter in process. It behaves like the engine for the checks the engine
//! performs (negative verbosity, malformed config entries, dead adapter
//! references, missing adapter files) and additionally:
//!
//! - records every call in the order it reached the native layer
//! - lets callers inject a one-shot failure for any fallible operation
//! - counts releases of references it does not know (double releases)
//!
//! Clones share state, so a test can keep one clone for inspection while the
//! handle under test owns another.

use crate::api::NativeApi;
use parking_lot::Mutex;
use runopts_core::{ErrorCode, LoggingLevel, NativeResult, NativeStatus};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::ffi::CStr;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::Arc;

/// Longest configuration key the backend accepts
pub const MAX_CONFIG_KEY_LEN: usize = 1024;

/// Longest configuration value the backend accepts
pub const MAX_CONFIG_VALUE_LEN: usize = 4096;

// ============================================================================
// Identifiers
// ============================================================================

/// Reference to an in-memory run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunOptionsId(NonZeroU64);

impl RunOptionsId {
    /// Raw identifier value
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RunOptionsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-options#{}", self.0)
    }
}

/// Reference to an in-memory adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(NonZeroU64);

impl AdapterId {
    /// Raw identifier value
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adapter#{}", self.0)
    }
}

// ============================================================================
// Call log
// ============================================================================

/// Native operations, used for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `create_run_options`
    CreateRunOptions,
    /// `release_run_options`
    ReleaseRunOptions,
    /// `set_log_severity_level`
    SetLogSeverityLevel,
    /// `set_log_verbosity_level`
    SetLogVerbosityLevel,
    /// `set_run_tag`
    SetRunTag,
    /// `set_terminate`
    SetTerminate,
    /// `unset_terminate`
    UnsetTerminate,
    /// `add_config_entry`
    AddConfigEntry,
    /// `add_active_adapter`
    AddActiveAdapter,
    /// `create_adapter` and `create_adapter_from_bytes`
    CreateAdapter,
    /// `release_adapter`
    ReleaseAdapter,
}

/// One call as received by the native layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    /// Allocation attempt (recorded even when it fails)
    CreateRunOptions,
    /// Release of a run configuration
    ReleaseRunOptions(RunOptionsId),
    /// Severity update
    SetLogSeverityLevel {
        /// Target configuration
        options: RunOptionsId,
        /// Requested level
        level: LoggingLevel,
    },
    /// Verbosity update
    SetLogVerbosityLevel {
        /// Target configuration
        options: RunOptionsId,
        /// Requested level
        level: i32,
    },
    /// Tag update
    SetRunTag {
        /// Target configuration
        options: RunOptionsId,
        /// Requested tag
        tag: String,
    },
    /// Terminate request
    SetTerminate(RunOptionsId),
    /// Terminate cleared
    UnsetTerminate(RunOptionsId),
    /// Configuration entry
    AddConfigEntry {
        /// Target configuration
        options: RunOptionsId,
        /// Entry key
        key: String,
        /// Entry value
        value: String,
    },
    /// Adapter activation
    AddActiveAdapter {
        /// Target configuration
        options: RunOptionsId,
        /// Adapter reference
        adapter: AdapterId,
    },
    /// Adapter load attempt
    CreateAdapter,
    /// Adapter release
    ReleaseAdapter(AdapterId),
}

impl NativeCall {
    /// The operation this call belongs to
    pub fn operation(&self) -> Operation {
        match self {
            NativeCall::CreateRunOptions => Operation::CreateRunOptions,
            NativeCall::ReleaseRunOptions(_) => Operation::ReleaseRunOptions,
            NativeCall::SetLogSeverityLevel { .. } => Operation::SetLogSeverityLevel,
            NativeCall::SetLogVerbosityLevel { .. } => Operation::SetLogVerbosityLevel,
            NativeCall::SetRunTag { .. } => Operation::SetRunTag,
            NativeCall::SetTerminate(_) => Operation::SetTerminate,
            NativeCall::UnsetTerminate(_) => Operation::UnsetTerminate,
            NativeCall::AddConfigEntry { .. } => Operation::AddConfigEntry,
            NativeCall::AddActiveAdapter { .. } => Operation::AddActiveAdapter,
            NativeCall::CreateAdapter => Operation::CreateAdapter,
            NativeCall::ReleaseAdapter(_) => Operation::ReleaseAdapter,
        }
    }
}

// ============================================================================
// Native-side state
// ============================================================================

/// Native-side view of one run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptionsState {
    /// Log severity filter
    pub log_severity_level: LoggingLevel,
    /// Verbose-logging level
    pub log_verbosity_level: i32,
    /// Log tag
    pub run_tag: String,
    /// Terminate flag
    pub terminate: bool,
    /// Configuration entries, last write wins
    pub config_entries: BTreeMap<String, String>,
    /// Active adapters, in activation order
    pub active_adapters: Vec<AdapterId>,
}

impl Default for RunOptionsState {
    fn default() -> Self {
        Self {
            log_severity_level: LoggingLevel::Warning,
            log_verbosity_level: 0,
            run_tag: String::new(),
            terminate: false,
            config_entries: BTreeMap::new(),
            active_adapters: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    allocated: u64,
    run_options: HashMap<RunOptionsId, RunOptionsState>,
    adapters: HashMap<AdapterId, usize>,
    calls: Vec<NativeCall>,
    failures: HashMap<Operation, VecDeque<NativeStatus>>,
    stray_releases: usize,
}

impl State {
    fn next_id(&mut self) -> NonZeroU64 {
        let id = NonZeroU64::MIN.saturating_add(self.allocated);
        self.allocated += 1;
        id
    }

    /// Log the call, then consume an injected failure for its operation.
    fn enter(&mut self, call: NativeCall) -> NativeResult<()> {
        tracing::trace!(call = ?call, "in-memory native call");
        let operation = call.operation();
        self.calls.push(call);
        match self.failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }

    fn options_mut(&mut self, id: RunOptionsId) -> NativeResult<&mut RunOptionsState> {
        self.run_options
            .get_mut(&id)
            .ok_or_else(|| NativeStatus::invalid_argument(format!("{} is not live", id)))
    }

    fn insert_adapter(&mut self, size: usize) -> AdapterId {
        let id = AdapterId(self.next_id());
        self.adapters.insert(id, size);
        id
    }
}

/// In-process implementation of [`NativeApi`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryApi {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `operation` fail with `status`.
    ///
    /// Injections queue up: calling this twice fails the next two calls.
    /// Release operations cannot fail and ignore injections.
    pub fn fail_next(&self, operation: Operation, status: NativeStatus) {
        self.state
            .lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(status);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<NativeCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls received for `operation`
    pub fn count(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Forget the call log (state and pending failures are kept)
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Native-side state of a live run configuration
    pub fn run_options(&self, id: RunOptionsId) -> Option<RunOptionsState> {
        self.state.lock().run_options.get(&id).cloned()
    }

    /// Number of run configurations allocated and not yet released
    pub fn live_run_options(&self) -> usize {
        self.state.lock().run_options.len()
    }

    /// Number of adapters allocated and not yet released
    pub fn live_adapters(&self) -> usize {
        self.state.lock().adapters.len()
    }

    /// Releases that named an unknown or already released reference
    pub fn stray_releases(&self) -> usize {
        self.state.lock().stray_releases
    }
}

fn text(value: &CStr, what: &str) -> NativeResult<String> {
    value
        .to_str()
        .map(str::to_owned)
        .map_err(|_| NativeStatus::invalid_argument(format!("{} is not valid UTF-8", what)))
}

impl NativeApi for InMemoryApi {
    type RunOptions = RunOptionsId;
    type Adapter = AdapterId;

    fn create_run_options(&self) -> NativeResult<RunOptionsId> {
        let mut state = self.state.lock();
        state.enter(NativeCall::CreateRunOptions)?;
        let id = RunOptionsId(state.next_id());
        state.run_options.insert(id, RunOptionsState::default());
        Ok(id)
    }

    fn release_run_options(&self, options: RunOptionsId) {
        let mut state = self.state.lock();
        state.calls.push(NativeCall::ReleaseRunOptions(options));
        if state.run_options.remove(&options).is_none() {
            state.stray_releases += 1;
        }
    }

    fn set_log_severity_level(&self, options: RunOptionsId, level: LoggingLevel) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.enter(NativeCall::SetLogSeverityLevel { options, level })?;
        state.options_mut(options)?.log_severity_level = level;
        Ok(())
    }

    fn set_log_verbosity_level(&self, options: RunOptionsId, level: i32) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.enter(NativeCall::SetLogVerbosityLevel { options, level })?;
        if level < 0 {
            return Err(NativeStatus::invalid_argument(format!(
                "log verbosity level must be non-negative, got {}",
                level
            )));
        }
        state.options_mut(options)?.log_verbosity_level = level;
        Ok(())
    }

    fn set_run_tag(&self, options: RunOptionsId, tag: &CStr) -> NativeResult<()> {
        let tag = text(tag, "run tag")?;
        let mut state = self.state.lock();
        state.enter(NativeCall::SetRunTag {
            options,
            tag: tag.clone(),
        })?;
        state.options_mut(options)?.run_tag = tag;
        Ok(())
    }

    fn set_terminate(&self, options: RunOptionsId) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.enter(NativeCall::SetTerminate(options))?;
        state.options_mut(options)?.terminate = true;
        Ok(())
    }

    fn unset_terminate(&self, options: RunOptionsId) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.enter(NativeCall::UnsetTerminate(options))?;
        state.options_mut(options)?.terminate = false;
        Ok(())
    }

    fn add_config_entry(&self, options: RunOptionsId, key: &CStr, value: &CStr) -> NativeResult<()> {
        let key = text(key, "config key")?;
        let value = text(value, "config value")?;
        let mut state = self.state.lock();
        state.enter(NativeCall::AddConfigEntry {
            options,
            key: key.clone(),
            value: value.clone(),
        })?;
        if key.is_empty() || key.len() > MAX_CONFIG_KEY_LEN {
            return Err(NativeStatus::invalid_argument(format!(
                "config key must be 1..={} bytes, got {}",
                MAX_CONFIG_KEY_LEN,
                key.len()
            )));
        }
        if value.len() > MAX_CONFIG_VALUE_LEN {
            return Err(NativeStatus::invalid_argument(format!(
                "config value for '{}' exceeds {} bytes",
                key, MAX_CONFIG_VALUE_LEN
            )));
        }
        state.options_mut(options)?.config_entries.insert(key, value);
        Ok(())
    }

    fn add_active_adapter(&self, options: RunOptionsId, adapter: AdapterId) -> NativeResult<()> {
        let mut state = self.state.lock();
        state.enter(NativeCall::AddActiveAdapter { options, adapter })?;
        if !state.adapters.contains_key(&adapter) {
            return Err(NativeStatus::invalid_argument(format!(
                "{} is not live",
                adapter
            )));
        }
        state.options_mut(options)?.active_adapters.push(adapter);
        Ok(())
    }

    fn create_adapter(&self, path: &CStr) -> NativeResult<AdapterId> {
        let path = text(path, "adapter path")?;
        self.state.lock().enter(NativeCall::CreateAdapter)?;
        // File I/O happens outside the lock.
        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                NativeStatus::new(ErrorCode::NoSuchFile, format!("{}: {}", path, e))
            }
            _ => NativeStatus::fail(format!("failed to read adapter '{}': {}", path, e)),
        })?;
        if bytes.is_empty() {
            return Err(NativeStatus::invalid_argument(format!(
                "adapter file '{}' is empty",
                path
            )));
        }
        Ok(self.state.lock().insert_adapter(bytes.len()))
    }

    fn create_adapter_from_bytes(&self, bytes: &[u8]) -> NativeResult<AdapterId> {
        let mut state = self.state.lock();
        state.enter(NativeCall::CreateAdapter)?;
        if bytes.is_empty() {
            return Err(NativeStatus::invalid_argument("adapter buffer is empty"));
        }
        Ok(state.insert_adapter(bytes.len()))
    }

    fn release_adapter(&self, adapter: AdapterId) {
        let mut state = self.state.lock();
        state.calls.push(NativeCall::ReleaseAdapter(adapter));
        if state.adapters.remove(&adapter).is_none() {
            state.stray_releases += 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
