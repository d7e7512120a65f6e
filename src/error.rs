//! Unified error type for runopts.
//!
//! Every fallible operation returns [`Result`]. Native status codes are
//! folded into four kinds so callers can decide what to do without knowing
//! the engine's code table.

use runopts_core::NativeStatus;
use thiserror::Error;

/// All runopts errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The native layer could not allocate a resource.
    ///
    /// Fatal to the construction attempt; no handle is produced.
    #[error("failed to allocate native {resource}: {status}")]
    ResourceAllocation {
        /// Kind of resource being allocated
        resource: &'static str,
        /// Status reported by the native layer
        status: NativeStatus,
    },

    /// The handle has been released and can no longer be used.
    #[error("invalid handle: native {0} has been released")]
    InvalidHandle(&'static str),

    /// A supplied value was rejected, locally or by the native layer.
    ///
    /// Local state is unchanged; the call may be retried with corrected input.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was rejected
        message: String,
        /// Status reported by the native layer, when the rejection came from it
        status: Option<NativeStatus>,
    },

    /// Any other native failure. Local state is unchanged.
    #[error("native call {operation} failed: {status}")]
    NativeCall {
        /// Primitive that failed
        operation: &'static str,
        /// Status reported by the native layer
        status: NativeStatus,
    },
}

/// Result type for runopts operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// A value rejected before reaching the native layer.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
            status: None,
        }
    }

    /// Classify a native status by its code.
    ///
    /// `InvalidArgument` statuses become [`Error::InvalidArgument`]; every
    /// other code becomes [`Error::NativeCall`]. The status is kept either way.
    pub fn from_native(operation: &'static str, status: NativeStatus) -> Self {
        if status.is_invalid_argument() {
            Error::InvalidArgument {
                message: format!("{} rejected: {}", operation, status.message),
                status: Some(status),
            }
        } else {
            Error::NativeCall { operation, status }
        }
    }

    /// Check if this is an invalid-handle error.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Error::InvalidHandle(_))
    }

    /// Check if this is an invalid-argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    /// Check if this is an allocation failure.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Error::ResourceAllocation { .. })
    }

    /// Native status behind this error, when there is one.
    pub fn native_status(&self) -> Option<&NativeStatus> {
        match self {
            Error::ResourceAllocation { status, .. } | Error::NativeCall { status, .. } => {
                Some(status)
            }
            Error::InvalidArgument { status, .. } => status.as_ref(),
            Error::InvalidHandle(_) => None,
        }
    }
}
