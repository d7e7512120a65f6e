//! Log severity levels understood by the native engine
//!
//! Levels are ordered from most to least chatty:
//!
//! | Level | Native value |
//! |-------|--------------|
//! | Verbose | 0 |
//! | Info | 1 |
//! | Warning | 2 |
//! | Error | 3 |
//! | Fatal | 4 |
//!
//! The verbosity level of a run configuration is only honoured by the engine
//! when the severity is [`LoggingLevel::Verbose`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity filter for log lines emitted during a run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    /// Everything, including per-node tracing
    Verbose,
    /// Informational messages
    Info,
    /// Warnings (engine default)
    #[default]
    Warning,
    /// Errors only
    Error,
    /// Fatal errors only
    Fatal,
}

impl LoggingLevel {
    /// All levels, in ascending severity
    pub const ALL: [LoggingLevel; 5] = [
        LoggingLevel::Verbose,
        LoggingLevel::Info,
        LoggingLevel::Warning,
        LoggingLevel::Error,
        LoggingLevel::Fatal,
    ];

    /// Integer passed across the native boundary
    pub const fn as_native(&self) -> i32 {
        match self {
            LoggingLevel::Verbose => 0,
            LoggingLevel::Info => 1,
            LoggingLevel::Warning => 2,
            LoggingLevel::Error => 3,
            LoggingLevel::Fatal => 4,
        }
    }

    /// Short lowercase identifier (used by serde and `FromStr`)
    pub const fn id(&self) -> &'static str {
        match self {
            LoggingLevel::Verbose => "verbose",
            LoggingLevel::Info => "info",
            LoggingLevel::Warning => "warning",
            LoggingLevel::Error => "error",
            LoggingLevel::Fatal => "fatal",
        }
    }

    /// Whether the verbosity level takes effect at this severity
    pub const fn honours_verbosity(&self) -> bool {
        matches!(self, LoggingLevel::Verbose)
    }
}

impl fmt::Display for LoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a string names no logging level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown logging level: {0}")]
pub struct ParseLoggingLevelError(pub String);

impl FromStr for LoggingLevel {
    type Err = ParseLoggingLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        LoggingLevel::ALL
            .iter()
            .copied()
            .find(|level| level.id() == lowered)
            .ok_or_else(|| ParseLoggingLevelError(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
