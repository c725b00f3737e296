//! Exclusive file locking.
//!
//! This module coordinates access to shared files between processes through
//! advisory lock artifacts on disk:
//!
//! - [`lock`] claims a target path and returns an RAII guard.
//! - [`open_exclusive`] claims a target path and opens it, returning a
//!   [`LockedFile`] that closes the file before releasing the lock.
//! - [`break_lock`] forcibly clears a stale artifact after a crash.
//!
//! # Lock Artifacts
//!
//! A lock on `target` is a sibling file named `<target>.lock`, created with
//! **create_new** semantics (exclusive create) so only one process can hold a
//! given lock at a time. The target itself need not exist. Each artifact
//! contains JSON metadata identifying the holder:
//! - `owner`: `user@host` of the holding process
//! - `pid`: process ID (optional)
//! - `created_at`: RFC3339 timestamp
//!
//! # Retry Policy
//!
//! A single acquisition attempt polls for up to [`LockOptions::timeout`]. On
//! failure the attempt is repeated after [`LockOptions::retry_delay`], up to
//! [`LockOptions::attempts`] total. The policy is bounded-linear: no backoff,
//! no jitter. Exhausting the budget surfaces a
//! [`FilekitError::LockTimeout`](crate::error::FilekitError::LockTimeout);
//! callers tolerate brief contention, not prolonged unavailability.
//!
//! # RAII Guards
//!
//! Locks are released through guard objects that remove the artifact when
//! dropped, on every exit path. If removal fails during drop, a warning is
//! printed but the program does not crash.
//!
//! # Advisory Only
//!
//! Exclusivity holds only between processes that use these helpers. Nothing
//! stops a process that opens the target directly.

mod guard;
mod metadata;
mod operations;
mod options;

#[cfg(test)]
mod tests;

// Re-export public API
pub use guard::{LockGuard, LockedFile};
pub use metadata::LockMetadata;
pub use operations::{break_lock, inspect_lock, lock, lock_artifact_path, open_exclusive};
pub use options::LockOptions;
