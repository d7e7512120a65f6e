//! Convenient imports for runopts.
//!
//! ```ignore
//! use runopts::prelude::*;
//!
//! let options = RunOptions::new(InMemoryApi::new())?;
//! ```

// Handles
pub use crate::{LoraAdapter, RunOptions};

// Configuration
pub use crate::{config_keys, RunOptionsBuilder, RunOptionsConfig};

// Error handling
pub use crate::{Error, Result};

// Core types
pub use crate::LoggingLevel;

// Backends
pub use crate::{FfiApi, InMemoryApi, NativeApi};
