//! JSON persistence helpers.
//!
//! Thin convenience layer over serde_json for the common "settings file on
//! disk" pattern: pretty-printed output, parent directories created on save,
//! atomic replacement so readers never see a torn file, and a lenient load
//! path for callers that want a default instead of an error.

use crate::error::{FilekitError, Result};
use crate::fs::atomic_write;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Save a value as pretty-printed JSON.
///
/// Parent directories are created if missing and the file is replaced
/// atomically.
pub fn save_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        FilekitError::SerializeError(format!(
            "failed to serialize value for '{}': {}",
            path.as_ref().display(),
            e
        ))
    })?;

    atomic_write(path, json.as_bytes())
}

/// Load a JSON file.
///
/// Returns `Ok(None)` when the file does not exist or is empty. A file that
/// exists but cannot be read or parsed is an error; use [`load_json_or`] for
/// the lenient variant.
pub fn load_json<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<Option<T>> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        FilekitError::ResourceError(format!("failed to read '{}': {}", path.display(), e))
    })?;

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| {
            FilekitError::SerializeError(format!("failed to parse '{}': {}", path.display(), e))
        })
}

/// Load a JSON file, falling back to `default` when the file is missing,
/// empty, unreadable, or unparsable.
///
/// Lossy by design: parse errors are swallowed, so callers that need to
/// distinguish "no file yet" from "corrupt file" should use [`load_json`].
pub fn load_json_or<P: AsRef<Path>, T: DeserializeOwned>(path: P, default: T) -> T {
    match load_json(path) {
        Ok(Some(value)) => value,
        Ok(None) | Err(_) => default,
    }
}
