//! Single-file and directory operations.

use crate::error::{FilekitError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a directory (and any missing parents) if it does not already exist.
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| {
        FilekitError::ResourceError(format!(
            "failed to create directory '{}': {}",
            dir.display(),
            e
        ))
    })
}

/// Copy a file, creating the destination's parent directory first.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<u64> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        ensure_dir(parent)?;
    }

    fs::copy(source, destination).map_err(|e| {
        FilekitError::ResourceError(format!(
            "failed to copy '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))
    })
}

/// Move a single file from `source` to `destination`.
///
/// - Creates the destination's parent directory first.
/// - Tries `rename()` (atomic when possible).
/// - Falls back to an atomic write of `destination` + delete of `source` when
///   the rename crosses filesystems (EXDEV).
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        ensure_dir(parent)?;
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_rename(&e) => move_cross_device(source, destination, e),
        Err(e) => Err(FilekitError::ResourceError(format!(
            "failed to move '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))),
    }
}

fn move_cross_device(
    source: &Path,
    destination: &Path,
    original_error: std::io::Error,
) -> Result<()> {
    let content = fs::read(source).map_err(|e| {
        FilekitError::ResourceError(format!(
            "failed to read '{}' for cross-device move: {} (original rename error: {})",
            source.display(),
            e,
            original_error
        ))
    })?;

    super::atomic_write(destination, &content)?;

    fs::remove_file(source).map_err(|e| {
        FilekitError::ResourceError(format!(
            "moved file across devices but failed to delete source '{}': {}",
            source.display(),
            e
        ))
    })
}

fn is_cross_device_rename(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}

/// Delete a file. With `force`, a read-only file is made writable first.
pub fn remove_file<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
    let path = path.as_ref();

    if force {
        make_writable(path)?;
    }

    fs::remove_file(path).map_err(|e| {
        FilekitError::ResourceError(format!("failed to delete '{}': {}", path.display(), e))
    })
}

/// Delete an entire directory tree, clearing read-only bits as it goes.
///
/// Plain `remove_dir_all` fails on write-protected entries; this walks the
/// tree and makes each entry writable before deleting it.
pub fn remove_dir_all_force<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();

    let entries = fs::read_dir(dir).map_err(|e| {
        FilekitError::ResourceError(format!(
            "failed to read directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            FilekitError::ResourceError(format!(
                "failed to read entry in '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let path = entry.path();
        if path.is_dir() {
            remove_dir_all_force(&path)?;
        } else {
            remove_file(&path, true)?;
        }
    }

    fs::remove_dir(dir).map_err(|e| {
        FilekitError::ResourceError(format!(
            "failed to remove directory '{}': {}",
            dir.display(),
            e
        ))
    })
}

/// Check whether a path can be written to. Errors if the path does not exist.
pub fn is_writable<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| {
        FilekitError::ResourceError(format!("'{}' does not exist: {}", path.display(), e))
    })?;

    Ok(!metadata.permissions().readonly())
}

fn make_writable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| {
        FilekitError::ResourceError(format!(
            "failed to read metadata for '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions).map_err(|e| {
            FilekitError::ResourceError(format!(
                "failed to make '{}' writable: {}",
                path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// Create an empty temporary file and return its path.
///
/// The file is placed under `dir` (the system temp directory when `None`),
/// named `{prefix}_XXXX.{ext}`, and is NOT deleted automatically; the caller
/// owns it from here.
pub fn temp_file_path(prefix: &str, ext: &str, dir: Option<&Path>) -> Result<PathBuf> {
    let base_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::temp_dir(),
    };
    ensure_dir(&base_dir)?;

    let temp_file = tempfile::Builder::new()
        .prefix(&format!("{}_", prefix))
        .suffix(&format!(".{}", ext.trim_start_matches('.')))
        .tempfile_in(&base_dir)
        .map_err(|e| {
            FilekitError::ResourceError(format!(
                "failed to create temp file in '{}': {}",
                base_dir.display(),
                e
            ))
        })?;

    let (_file, path) = temp_file.keep().map_err(|e| {
        FilekitError::ResourceError(format!("failed to persist temp file: {}", e))
    })?;

    Ok(path)
}
