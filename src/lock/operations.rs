//! Lock acquisition, inspection, and forcible clearing.

use super::guard::{LockGuard, LockedFile};
use super::metadata::LockMetadata;
use super::options::LockOptions;
use crate::error::{FilekitError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Path of the lock artifact for a target: `<target>.lock` as a sibling file.
pub fn lock_artifact_path<P: AsRef<Path>>(target: P) -> PathBuf {
    let mut artifact = target.as_ref().as_os_str().to_os_string();
    artifact.push(".lock");
    PathBuf::from(artifact)
}

/// Acquire an exclusive lock on `target`.
///
/// The target need not exist; the lock protects the path, not the file.
/// Blocks the calling thread for up to
/// `attempts * (timeout + retry_delay)` in the worst case, then fails with
/// [`FilekitError::LockTimeout`].
pub fn lock<P: AsRef<Path>>(target: P, options: &LockOptions) -> Result<LockGuard> {
    acquire(target.as_ref(), options)
}

/// Acquire an exclusive lock on `target`, then open it.
///
/// `open_options` controls the open mode (read/write/append/create...). If
/// the open fails after the lock is held, the lock is released before the
/// error propagates. Dropping the returned [`LockedFile`] closes the file
/// first and then releases the lock.
///
/// Exclusivity only holds against other users of these helpers.
pub fn open_exclusive<P: AsRef<Path>>(
    target: P,
    open_options: &OpenOptions,
    lock_options: &LockOptions,
) -> Result<LockedFile> {
    let target = target.as_ref();
    let guard = acquire(target, lock_options)?;

    // Guard is dropped (lock released) if the open fails.
    let file = open_options.open(target).map_err(|e| {
        FilekitError::ResourceError(format!(
            "failed to open locked file '{}': {}",
            target.display(),
            e
        ))
    })?;

    Ok(LockedFile::new(file, guard))
}

/// Forcibly remove the lock artifact for `target`, whoever holds it.
///
/// **This performs no ownership check.** It exists for operator-driven
/// recovery when a process died without releasing its lock; used against a
/// live holder it lets two processes believe they each hold the lock. It is
/// deliberately a separate call path from acquire/release. Clearing a target
/// that has no artifact is a no-op.
pub fn break_lock<P: AsRef<Path>>(target: P) -> Result<()> {
    let artifact = lock_artifact_path(target);

    match fs::remove_file(&artifact) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FilekitError::LockError(format!(
            "failed to break lock '{}': {}",
            artifact.display(),
            e
        ))),
    }
}

/// Read the metadata of the lock currently held on `target`, if any.
///
/// For diagnosing contention: tells an operator who holds a lock and for how
/// long before they reach for [`break_lock`].
pub fn inspect_lock<P: AsRef<Path>>(target: P) -> Result<Option<LockMetadata>> {
    let artifact = lock_artifact_path(target);
    if !artifact.exists() {
        return Ok(None);
    }

    LockMetadata::from_file(&artifact).map(Some)
}

/// Bounded-linear retry loop around single acquisition attempts.
fn acquire(target: &Path, options: &LockOptions) -> Result<LockGuard> {
    let artifact = lock_artifact_path(target);
    let metadata = LockMetadata::new();
    let attempts = options.attempts.max(1);
    let mut last_failure = String::new();

    for attempt in 1..=attempts {
        match acquire_once(&artifact, &metadata, options) {
            Ok(guard) => return Ok(guard),
            Err(reason) => last_failure = reason,
        }

        if attempt < attempts {
            std::thread::sleep(options.retry_delay);
        }
    }

    Err(FilekitError::LockTimeout(format!(
        "could not claim '{}' after {} attempts: {}",
        target.display(),
        attempts,
        last_failure
    )))
}

/// One acquisition attempt.
///
/// Polls exclusive creation of the artifact until `timeout` elapses while the
/// lock is held elsewhere. A creation failure that is not contention (e.g.
/// missing directory, permission) ends the attempt immediately; the caller's
/// retry budget decides whether it was transient.
fn acquire_once(
    artifact: &Path,
    metadata: &LockMetadata,
    options: &LockOptions,
) -> std::result::Result<LockGuard, String> {
    let deadline = Instant::now() + options.timeout;

    loop {
        match try_create(artifact, metadata) {
            Ok(guard) => return Ok(guard),
            Err(CreateFailure::Held) => {
                if Instant::now() >= deadline {
                    return Err(holder_description(artifact));
                }
                std::thread::sleep(options.poll_interval);
            }
            Err(CreateFailure::Other(reason)) => return Err(reason),
        }
    }
}

enum CreateFailure {
    /// The artifact already exists: lock held elsewhere.
    Held,
    /// The artifact could not be created or written.
    Other(String),
}

/// Exclusively create the artifact and write holder metadata into it.
fn try_create(
    artifact: &Path,
    metadata: &LockMetadata,
) -> std::result::Result<LockGuard, CreateFailure> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(artifact)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                CreateFailure::Held
            } else {
                CreateFailure::Other(format!("failed to create lock artifact: {}", e))
            }
        })?;

    let json = metadata
        .to_json()
        .map_err(|e| CreateFailure::Other(e.to_string()))?;

    file.write_all(json.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            // Do not leave a half-written artifact claiming the lock.
            let _ = fs::remove_file(artifact);
            CreateFailure::Other(format!("failed to write lock metadata: {}", e))
        })?;

    Ok(LockGuard::new(artifact.to_path_buf()))
}

/// Describe the current holder for the timeout error message.
fn holder_description(artifact: &Path) -> String {
    match LockMetadata::from_file(artifact) {
        Ok(meta) => format!(
            "lock is held by another process (created {} ago by {})",
            meta.age_string(),
            meta.owner
        ),
        Err(_) => "lock is held by another process".to_string(),
    }
}
