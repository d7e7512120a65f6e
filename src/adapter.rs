//! Owning handle to a native adapter.
//!
//! An adapter is a model-customisation overlay loaded once and activated on
//! any number of run configurations. Configurations only borrow it.

use crate::error::{Error, Result};
use crate::text::path_to_c_string;
use runopts_native::NativeApi;
use std::fmt;
use std::path::Path;
use tracing::debug;

const RESOURCE: &str = "adapter";

/// Owning handle to a native adapter.
///
/// Released on drop or by [`LoraAdapter::release`]. Run configurations that
/// activated the adapter borrow it, so it cannot be released while one of
/// them is alive.
pub struct LoraAdapter<A: NativeApi> {
    api: A,
    raw: Option<A::Adapter>,
}

impl<A: NativeApi> LoraAdapter<A> {
    /// Load an adapter file.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidArgument` - `path` is not valid UTF-8 or contains a NUL byte
    /// * `Error::ResourceAllocation` - the native layer could not load the file
    pub fn from_file(api: A, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let c_path = path_to_c_string("adapter path", path)?;
        let raw = api
            .create_adapter(&c_path)
            .map_err(|status| Error::ResourceAllocation {
                resource: RESOURCE,
                status,
            })?;
        debug!(native_ref = ?raw, path = %path.display(), "loaded adapter");
        Ok(Self { api, raw: Some(raw) })
    }

    /// Load an adapter from an in-memory buffer.
    ///
    /// The native layer copies `bytes`; the buffer may be dropped afterwards.
    pub fn from_bytes(api: A, bytes: &[u8]) -> Result<Self> {
        let raw = api
            .create_adapter_from_bytes(bytes)
            .map_err(|status| Error::ResourceAllocation {
                resource: RESOURCE,
                status,
            })?;
        debug!(native_ref = ?raw, len = bytes.len(), "loaded adapter from buffer");
        Ok(Self { api, raw: Some(raw) })
    }

    /// Whether the handle still owns its native adapter.
    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// Native reference.
    pub fn native_ref(&self) -> Result<A::Adapter> {
        self.raw.ok_or(Error::InvalidHandle(RESOURCE))
    }

    /// Release the native adapter. Idempotent.
    pub fn release(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.api.release_adapter(raw);
            debug!(native_ref = ?raw, "released adapter");
        }
    }
}

impl<A: NativeApi> Drop for LoraAdapter<A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<A: NativeApi> fmt::Debug for LoraAdapter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoraAdapter")
            .field("native_ref", &self.raw)
            .finish()
    }
}
