//! C binding for the engine's run-configuration API.
//!
//! The engine exposes its primitives as a table of function pointers; the host
//! resolves that table (from the engine's API base, a dynamically loaded
//! library, or a static link) and hands it to [`FfiApi::new`].
//!
//! Status convention: a null status pointer is success. A non-null status is
//! read with `get_error_code` / `get_error_message` and then released with
//! `release_status`, exactly once.

use crate::api::NativeApi;
use runopts_core::{ErrorCode, LoggingLevel, NativeResult, NativeStatus};
use std::ffi::{c_char, c_int, c_void, CStr};
use std::ptr::{self, NonNull};

/// Opaque native run configuration
#[repr(C)]
pub struct OrtRunOptions {
    _private: [u8; 0],
}

/// Opaque native adapter
#[repr(C)]
pub struct OrtLoraAdapter {
    _private: [u8; 0],
}

/// Opaque native status
#[repr(C)]
pub struct OrtStatus {
    _private: [u8; 0],
}

/// Opaque native allocator (null selects the engine default)
#[repr(C)]
pub struct OrtAllocator {
    _private: [u8; 0],
}

/// Status pointer returned by fallible primitives; null means success
pub type OrtStatusPtr = *mut OrtStatus;

/// Function table of the engine's run-configuration primitives
#[derive(Debug, Clone, Copy)]
pub struct RunOptionsVTable {
    /// Allocate a run configuration with engine defaults
    pub create_run_options: unsafe extern "C" fn(out: *mut *mut OrtRunOptions) -> OrtStatusPtr,
    /// Free a run configuration
    pub release_run_options: unsafe extern "C" fn(options: *mut OrtRunOptions),
    /// Set the log verbosity level
    pub set_run_log_verbosity_level:
        unsafe extern "C" fn(options: *mut OrtRunOptions, level: c_int) -> OrtStatusPtr,
    /// Set the log severity level
    pub set_run_log_severity_level:
        unsafe extern "C" fn(options: *mut OrtRunOptions, level: c_int) -> OrtStatusPtr,
    /// Set the log tag
    pub set_run_tag:
        unsafe extern "C" fn(options: *mut OrtRunOptions, tag: *const c_char) -> OrtStatusPtr,
    /// Request termination of runs using the configuration
    pub set_terminate: unsafe extern "C" fn(options: *mut OrtRunOptions) -> OrtStatusPtr,
    /// Clear a termination request
    pub unset_terminate: unsafe extern "C" fn(options: *mut OrtRunOptions) -> OrtStatusPtr,
    /// Add a key/value configuration entry
    pub add_run_config_entry: unsafe extern "C" fn(
        options: *mut OrtRunOptions,
        key: *const c_char,
        value: *const c_char,
    ) -> OrtStatusPtr,
    /// Activate an adapter without taking ownership
    pub add_active_lora_adapter: unsafe extern "C" fn(
        options: *mut OrtRunOptions,
        adapter: *const OrtLoraAdapter,
    ) -> OrtStatusPtr,
    /// Load an adapter file
    pub create_lora_adapter: unsafe extern "C" fn(
        path: *const c_char,
        allocator: *mut OrtAllocator,
        out: *mut *mut OrtLoraAdapter,
    ) -> OrtStatusPtr,
    /// Load an adapter from a buffer the engine copies
    pub create_lora_adapter_from_array: unsafe extern "C" fn(
        bytes: *const c_void,
        len: usize,
        allocator: *mut OrtAllocator,
        out: *mut *mut OrtLoraAdapter,
    ) -> OrtStatusPtr,
    /// Free an adapter
    pub release_lora_adapter: unsafe extern "C" fn(adapter: *mut OrtLoraAdapter),
    /// Code of a failed status
    pub get_error_code: unsafe extern "C" fn(status: *const OrtStatus) -> c_int,
    /// Message of a failed status, owned by the status
    pub get_error_message: unsafe extern "C" fn(status: *const OrtStatus) -> *const c_char,
    /// Free a status
    pub release_status: unsafe extern "C" fn(status: *mut OrtStatus),
}

/// Non-null pointer to a native run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRunOptions(NonNull<OrtRunOptions>);

impl RawRunOptions {
    /// Pointer to hand to the engine's run call
    pub fn as_ptr(&self) -> *mut OrtRunOptions {
        self.0.as_ptr()
    }
}

// SAFETY: the value is only an address. Which calls may use it concurrently is
// governed by the `NativeApi` contract, not by where the address lives.
unsafe impl Send for RawRunOptions {}
unsafe impl Sync for RawRunOptions {}

/// Non-null pointer to a native adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAdapter(NonNull<OrtLoraAdapter>);

impl RawAdapter {
    /// Pointer to the native adapter
    pub fn as_ptr(&self) -> *mut OrtLoraAdapter {
        self.0.as_ptr()
    }
}

// SAFETY: see `RawRunOptions`.
unsafe impl Send for RawAdapter {}
unsafe impl Sync for RawAdapter {}

/// [`NativeApi`] backed by the engine's C function table
#[derive(Debug, Clone, Copy)]
pub struct FfiApi {
    table: &'static RunOptionsVTable,
}

impl FfiApi {
    /// Bind to a resolved function table.
    ///
    /// # Safety
    ///
    /// Every entry of `table` must be the engine's implementation of the named
    /// primitive with exactly the declared signature, and the engine library
    /// must stay loaded for the rest of the process.
    pub const unsafe fn new(table: &'static RunOptionsVTable) -> Self {
        Self { table }
    }

    /// Turn a status pointer into a result, releasing the status.
    fn check(&self, status: OrtStatusPtr) -> NativeResult<()> {
        if status.is_null() {
            return Ok(());
        }

        // SAFETY: non-null status produced by the engine; read, then released once.
        let (code, message) = unsafe {
            let code = (self.table.get_error_code)(status);
            let message_ptr = (self.table.get_error_message)(status);
            let message = if message_ptr.is_null() {
                String::new()
            } else {
                CStr::from_ptr(message_ptr).to_string_lossy().into_owned()
            };
            (self.table.release_status)(status);
            (code, message)
        };

        // A status object always signals failure, even if it claims code 0.
        let code = ErrorCode::from_native(code).unwrap_or(ErrorCode::Fail);
        Err(NativeStatus::new(code, message))
    }
}

fn non_null<T>(ptr: *mut T, what: &str) -> NativeResult<NonNull<T>> {
    NonNull::new(ptr).ok_or_else(|| NativeStatus::fail(format!("engine returned a null {}", what)))
}

impl NativeApi for FfiApi {
    type RunOptions = RawRunOptions;
    type Adapter = RawAdapter;

    fn create_run_options(&self) -> NativeResult<RawRunOptions> {
        let mut out: *mut OrtRunOptions = ptr::null_mut();
        // SAFETY: `out` is a valid location for the engine to write to.
        let status = unsafe { (self.table.create_run_options)(&mut out) };
        self.check(status)?;
        non_null(out, "run options").map(RawRunOptions)
    }

    fn release_run_options(&self, options: RawRunOptions) {
        // SAFETY: the owning handle releases each pointer exactly once.
        unsafe { (self.table.release_run_options)(options.as_ptr()) }
    }

    fn set_log_severity_level(&self, options: RawRunOptions, level: LoggingLevel) -> NativeResult<()> {
        // SAFETY: `options` is live.
        let status =
            unsafe { (self.table.set_run_log_severity_level)(options.as_ptr(), level.as_native()) };
        self.check(status)
    }

    fn set_log_verbosity_level(&self, options: RawRunOptions, level: i32) -> NativeResult<()> {
        // SAFETY: `options` is live.
        let status = unsafe { (self.table.set_run_log_verbosity_level)(options.as_ptr(), level) };
        self.check(status)
    }

    fn set_run_tag(&self, options: RawRunOptions, tag: &CStr) -> NativeResult<()> {
        // SAFETY: `options` is live; `tag` is NUL-terminated and outlives the call.
        let status = unsafe { (self.table.set_run_tag)(options.as_ptr(), tag.as_ptr()) };
        self.check(status)
    }

    fn set_terminate(&self, options: RawRunOptions) -> NativeResult<()> {
        // SAFETY: `options` is live; the engine allows this call concurrently with a run.
        let status = unsafe { (self.table.set_terminate)(options.as_ptr()) };
        self.check(status)
    }

    fn unset_terminate(&self, options: RawRunOptions) -> NativeResult<()> {
        // SAFETY: `options` is live.
        let status = unsafe { (self.table.unset_terminate)(options.as_ptr()) };
        self.check(status)
    }

    fn add_config_entry(&self, options: RawRunOptions, key: &CStr, value: &CStr) -> NativeResult<()> {
        // SAFETY: `options` is live; both strings are NUL-terminated and outlive the call.
        let status = unsafe {
            (self.table.add_run_config_entry)(options.as_ptr(), key.as_ptr(), value.as_ptr())
        };
        self.check(status)
    }

    fn add_active_adapter(&self, options: RawRunOptions, adapter: RawAdapter) -> NativeResult<()> {
        // SAFETY: both pointers are live; the caller keeps the adapter alive
        // for as long as the run configuration may be used.
        let status =
            unsafe { (self.table.add_active_lora_adapter)(options.as_ptr(), adapter.as_ptr()) };
        self.check(status)
    }

    fn create_adapter(&self, path: &CStr) -> NativeResult<RawAdapter> {
        let mut out: *mut OrtLoraAdapter = ptr::null_mut();
        // SAFETY: `path` is NUL-terminated; a null allocator selects the default.
        let status =
            unsafe { (self.table.create_lora_adapter)(path.as_ptr(), ptr::null_mut(), &mut out) };
        self.check(status)?;
        non_null(out, "adapter").map(RawAdapter)
    }

    fn create_adapter_from_bytes(&self, bytes: &[u8]) -> NativeResult<RawAdapter> {
        let mut out: *mut OrtLoraAdapter = ptr::null_mut();
        // SAFETY: the engine copies `bytes` before returning.
        let status = unsafe {
            (self.table.create_lora_adapter_from_array)(
                bytes.as_ptr().cast(),
                bytes.len(),
                ptr::null_mut(),
                &mut out,
            )
        };
        self.check(status)?;
        non_null(out, "adapter").map(RawAdapter)
    }

    fn release_adapter(&self, adapter: RawAdapter) {
        // SAFETY: the owning handle releases each pointer exactly once.
        unsafe { (self.table.release_lora_adapter)(adapter.as_ptr()) }
    }
}

// ============================================================================
// Tests
// ============================================================================
