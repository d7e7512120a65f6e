//! Text conversion for the native boundary.

use crate::error::{Error, Result};
use std::ffi::CString;
use std::path::Path;

/// Convert `value` into a NUL-terminated UTF-8 string.
pub(crate) fn to_c_string(what: &str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|e| {
        Error::invalid_argument(format!(
            "{} contains a NUL byte at offset {}",
            what,
            e.nul_position()
        ))
    })
}

/// Convert a filesystem path into a NUL-terminated UTF-8 string.
pub(crate) fn path_to_c_string(what: &str, path: &Path) -> Result<CString> {
    let text = path.to_str().ok_or_else(|| {
        Error::invalid_argument(format!("{} '{}' is not valid UTF-8", what, path.display()))
    })?;
    to_c_string(what, text)
}
