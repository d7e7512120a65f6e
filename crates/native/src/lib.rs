//! Native API seam for run configurations.
//!
//! The [`NativeApi`] trait is the only way the rest of the workspace talks to
//! the inference engine. Two backends implement it:
//!
//! - [`FfiApi`] forwards to a table of C function pointers resolved by the host
//! - [`InMemoryApi`] keeps native-side state in process and records every call
//!
//! # Safety boundary
//!
//! All `unsafe` code of the workspace lives in the [`ffi`] module.

pub mod api;
pub mod ffi;
pub mod memory;

pub use api::NativeApi;
pub use ffi::{FfiApi, RawAdapter, RawRunOptions, RunOptionsVTable};
pub use memory::{AdapterId, InMemoryApi, NativeCall, Operation, RunOptionsId, RunOptionsState};
pub use runopts_core::{ErrorCode, LoggingLevel, NativeResult, NativeStatus};
