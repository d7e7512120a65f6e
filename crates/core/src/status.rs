//! Native status codes
//!
//! Every fallible native primitive reports success or a [`NativeStatus`]
//! carrying one of the engine's error codes and its message.
//!
//! ## Error Codes
//!
//! | Code | Native value |
//! |------|--------------|
//! | Fail | 1 |
//! | InvalidArgument | 2 |
//! | NoSuchFile | 3 |
//! | NoModel | 4 |
//! | EngineError | 5 |
//! | RuntimeException | 6 |
//! | InvalidProtobuf | 7 |
//! | ModelLoaded | 8 |
//! | NotImplemented | 9 |
//! | InvalidGraph | 10 |
//! | EpFail | 11 |
//!
//! Zero is success and never appears inside a status.

use std::fmt;
use thiserror::Error;

/// Error code reported by the native layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Generic failure
    Fail,
    /// A supplied value was rejected
    InvalidArgument,
    /// A referenced file does not exist
    NoSuchFile,
    /// No model is loaded
    NoModel,
    /// Internal engine error
    EngineError,
    /// Exception raised inside the engine
    RuntimeException,
    /// Malformed model protobuf
    InvalidProtobuf,
    /// Model already loaded
    ModelLoaded,
    /// Operation not implemented by this build
    NotImplemented,
    /// Malformed graph
    InvalidGraph,
    /// Execution provider failure
    EpFail,
    /// A code this crate does not know about
    Unknown(i32),
}

impl ErrorCode {
    /// Map a native integer to a code.
    ///
    /// Returns `None` for zero, which means success.
    pub const fn from_native(code: i32) -> Option<Self> {
        Some(match code {
            0 => return None,
            1 => ErrorCode::Fail,
            2 => ErrorCode::InvalidArgument,
            3 => ErrorCode::NoSuchFile,
            4 => ErrorCode::NoModel,
            5 => ErrorCode::EngineError,
            6 => ErrorCode::RuntimeException,
            7 => ErrorCode::InvalidProtobuf,
            8 => ErrorCode::ModelLoaded,
            9 => ErrorCode::NotImplemented,
            10 => ErrorCode::InvalidGraph,
            11 => ErrorCode::EpFail,
            other => ErrorCode::Unknown(other),
        })
    }

    /// Integer used by the native layer
    pub const fn as_native(&self) -> i32 {
        match self {
            ErrorCode::Fail => 1,
            ErrorCode::InvalidArgument => 2,
            ErrorCode::NoSuchFile => 3,
            ErrorCode::NoModel => 4,
            ErrorCode::EngineError => 5,
            ErrorCode::RuntimeException => 6,
            ErrorCode::InvalidProtobuf => 7,
            ErrorCode::ModelLoaded => 8,
            ErrorCode::NotImplemented => 9,
            ErrorCode::InvalidGraph => 10,
            ErrorCode::EpFail => 11,
            ErrorCode::Unknown(code) => *code,
        }
    }

    /// Canonical name
    pub const fn name(&self) -> &'static str {
        match self {
            ErrorCode::Fail => "Fail",
            ErrorCode::InvalidArgument => "InvalidArgument",
            ErrorCode::NoSuchFile => "NoSuchFile",
            ErrorCode::NoModel => "NoModel",
            ErrorCode::EngineError => "EngineError",
            ErrorCode::RuntimeException => "RuntimeException",
            ErrorCode::InvalidProtobuf => "InvalidProtobuf",
            ErrorCode::ModelLoaded => "ModelLoaded",
            ErrorCode::NotImplemented => "NotImplemented",
            ErrorCode::InvalidGraph => "InvalidGraph",
            ErrorCode::EpFail => "EpFail",
            ErrorCode::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Unknown(code) => write!(f, "Unknown({})", code),
            other => f.write_str(other.name()),
        }
    }
}

/// A failed native call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct NativeStatus {
    /// Error code
    pub code: ErrorCode,
    /// Message text copied out of the native status
    pub message: String,
}

impl NativeStatus {
    /// Create a status
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidArgument` status
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Shorthand for a generic failure
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Fail, message)
    }

    /// Check if the native layer rejected a supplied value
    pub fn is_invalid_argument(&self) -> bool {
        self.code == ErrorCode::InvalidArgument
    }
}

/// Result of a fallible native primitive
pub type NativeResult<T> = std::result::Result<T, NativeStatus>;
