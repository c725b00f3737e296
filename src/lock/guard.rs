//! RAII lock guards.

use crate::error::{FilekitError, Result};
use std::fs::{self, File};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// RAII guard for a held lock.
///
/// Dropping the guard removes the lock artifact, so release happens on every
/// exit path of the owning scope. Exactly one release occurs per acquisition:
/// after [`release`](Self::release) the drop is a no-op. If removal fails
/// during drop, a warning is printed but no panic occurs.
#[derive(Debug)]
pub struct LockGuard {
    /// Path to the lock artifact on disk.
    artifact_path: PathBuf,

    /// Set once the artifact has been removed.
    released: bool,
}

impl LockGuard {
    pub(super) fn new(artifact_path: PathBuf) -> Self {
        Self {
            artifact_path,
            released: false,
        }
    }

    /// Path of the lock artifact this guard owns.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Release the lock now instead of at end of scope.
    ///
    /// Use this when a release failure must be handled explicitly rather than
    /// reported as a drop-time warning.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.artifact_path).map_err(|e| {
            FilekitError::LockError(format!(
                "failed to release lock '{}': {}",
                self.artifact_path.display(),
                e
            ))
        })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = fs::remove_file(&self.artifact_path)
        {
            eprintln!(
                "Warning: failed to release lock '{}': {}",
                self.artifact_path.display(),
                e
            );
        }
    }
}

/// A file opened while its lock is held.
///
/// Field order matters: the file handle is declared before the guard, so on
/// drop the file closes before the lock artifact is removed. Derefs to
/// [`File`] for reading and writing.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
    guard: LockGuard,
}

impl LockedFile {
    pub(super) fn new(file: File, guard: LockGuard) -> Self {
        Self { file, guard }
    }

    /// The guard holding the lock for this file.
    pub fn guard(&self) -> &LockGuard {
        &self.guard
    }

    /// Close the file and release the lock, reporting release failures.
    pub fn release(self) -> Result<()> {
        drop(self.file);
        self.guard.release()
    }
}

impl Deref for LockedFile {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

impl DerefMut for LockedFile {
    fn deref_mut(&mut self) -> &mut File {
        &mut self.file
    }
}
