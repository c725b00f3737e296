//! Tests for the lock subsystem.

use super::*;
use crate::error::{FilekitError, Result};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Timings small enough to make contention tests fast.
fn fast_options() -> LockOptions {
    LockOptions {
        timeout: Duration::from_millis(50),
        attempts: 3,
        retry_delay: Duration::from_millis(10),
        poll_interval: Duration::from_millis(5),
    }
}

fn target_in(temp: &TempDir, name: &str) -> PathBuf {
    temp.path().join(name)
}

#[test]
fn artifact_is_a_dot_lock_sibling() {
    assert_eq!(
        lock_artifact_path("/work/job_42.json"),
        PathBuf::from("/work/job_42.json.lock")
    );
}

#[test]
fn fresh_target_locks_on_first_attempt() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let guard = lock(&target, &fast_options()).unwrap();

    let artifact = lock_artifact_path(&target);
    assert!(artifact.exists());
    assert_eq!(guard.artifact_path(), artifact.as_path());

    // Target itself never needs to exist.
    assert!(!target.exists());

    drop(guard);
    assert!(!artifact.exists());
}

#[test]
fn artifact_records_holder_metadata() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let _guard = lock(&target, &fast_options()).unwrap();

    let meta = LockMetadata::from_file(lock_artifact_path(&target)).unwrap();
    assert!(meta.owner.contains('@'));
    assert_eq!(meta.pid, Some(std::process::id()));
}

#[test]
fn manual_release_removes_artifact_exactly_once() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let guard = lock(&target, &fast_options()).unwrap();
    guard.release().unwrap();

    assert!(!lock_artifact_path(&target).exists());

    // The target is free again.
    let again = lock(&target, &fast_options()).unwrap();
    again.release().unwrap();
}

#[test]
fn error_inside_scope_still_releases() {
    fn failing_operation(target: &Path) -> Result<()> {
        let _guard = lock(target, &fast_options())?;
        Err(FilekitError::ResourceError("mid-scope failure".to_string()))
    }

    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let result = failing_operation(&target);
    assert!(result.is_err());
    assert!(!lock_artifact_path(&target).exists());
}

#[test]
fn contention_across_full_budget_times_out() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let holder = lock(&target, &fast_options()).unwrap();

    let result = lock(&target, &fast_options());
    let err = result.unwrap_err();
    assert!(matches!(err, FilekitError::LockTimeout(_)));
    assert!(err.to_string().contains("3 attempts"));
    assert!(err.to_string().contains("held by another process"));

    // The first holder's lock is unaffected.
    assert!(lock_artifact_path(&target).exists());
    holder.release().unwrap();
}

#[test]
fn retry_succeeds_once_holder_releases() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let holder = lock(&target, &fast_options()).unwrap();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(40));
        drop(holder);
    });

    // Budget comfortably covers the holder's 40ms: 3 x (50ms + 10ms).
    let guard = lock(&target, &fast_options()).unwrap();
    handle.join().unwrap();

    assert!(lock_artifact_path(&target).exists());
    guard.release().unwrap();
}

#[test]
fn break_lock_recovers_from_a_crashed_holder() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    // Simulate a crash: an artifact nobody will ever release.
    let stale = LockMetadata::new();
    fs::write(lock_artifact_path(&target), stale.to_json().unwrap()).unwrap();

    assert!(matches!(
        lock(&target, &fast_options()),
        Err(FilekitError::LockTimeout(_))
    ));

    break_lock(&target).unwrap();

    let guard = lock(&target, &fast_options()).unwrap();
    guard.release().unwrap();
}

#[test]
fn break_lock_without_artifact_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    break_lock(target_in(&temp, "never_locked.json")).unwrap();
}

#[test]
fn breaking_one_target_leaves_other_locks_alone() {
    let temp = TempDir::new().unwrap();
    let target_a = target_in(&temp, "a.json");
    let target_b = target_in(&temp, "b.json");

    let guard_a = lock(&target_a, &fast_options()).unwrap();
    let guard_b = lock(&target_b, &fast_options()).unwrap();

    break_lock(&target_a).unwrap();

    // B's lock is intact and still releasable.
    assert!(lock_artifact_path(&target_b).exists());
    guard_b.release().unwrap();

    // A's guard now points at a missing artifact; dropping it warns but must
    // not panic.
    drop(guard_a);
}

#[test]
fn inspect_lock_reports_current_holder() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    assert!(inspect_lock(&target).unwrap().is_none());

    let guard = lock(&target, &fast_options()).unwrap();
    let meta = inspect_lock(&target).unwrap().unwrap();
    assert_eq!(meta.pid, Some(std::process::id()));

    guard.release().unwrap();
    assert!(inspect_lock(&target).unwrap().is_none());
}

#[test]
fn open_exclusive_writes_under_lock() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let mut locked = open_exclusive(
        &target,
        OpenOptions::new().write(true).create(true),
        &fast_options(),
    )
    .unwrap();

    locked.write_all(b"{\"frame\": 42}").unwrap();
    locked.release().unwrap();

    assert!(!lock_artifact_path(&target).exists());
    assert_eq!(fs::read(&target).unwrap(), b"{\"frame\": 42}");
}

#[test]
fn open_exclusive_reads_and_seeks_through_deref() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");
    fs::write(&target, b"payload").unwrap();

    let mut locked =
        open_exclusive(&target, OpenOptions::new().read(true), &fast_options()).unwrap();

    let mut content = String::new();
    locked.read_to_string(&mut content).unwrap();
    assert_eq!(content, "payload");

    locked.rewind().unwrap();
    locked.release().unwrap();
}

#[test]
fn open_failure_after_acquisition_releases_the_lock() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "missing.json");

    // Read-only open of a file that does not exist fails after the lock is
    // already held.
    let result = open_exclusive(&target, OpenOptions::new().read(true), &fast_options());
    assert!(matches!(result, Err(FilekitError::ResourceError(_))));

    // The lock was still released before the error propagated.
    assert!(!lock_artifact_path(&target).exists());
    let guard = lock(&target, &fast_options()).unwrap();
    guard.release().unwrap();
}

#[test]
fn failed_write_scenario_cleans_up_and_propagates() {
    // Acquire the lock, open the data file for writing, fail mid-write: the
    // file handle must close, the artifact must go, the error must surface.
    fn write_job(target: &Path) -> Result<()> {
        let mut locked = open_exclusive(
            target,
            OpenOptions::new().write(true).create(true),
            &fast_options(),
        )?;

        locked
            .write_all(b"partial")
            .map_err(|e| FilekitError::ResourceError(format!("write failed: {}", e)))?;

        Err(FilekitError::ResourceError(
            "render job aborted".to_string(),
        ))
    }

    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "job_42.json");

    let err = write_job(&target).unwrap_err();
    assert!(err.to_string().contains("render job aborted"));
    assert!(!lock_artifact_path(&target).exists());

    // The partial write landed, but the lock is free for the next claimant.
    assert_eq!(fs::read(&target).unwrap(), b"partial");
    let guard = lock(&target, &fast_options()).unwrap();
    guard.release().unwrap();
}

#[test]
fn missing_lock_directory_surfaces_as_timeout() {
    // The artifact cannot be created when the target's directory is missing;
    // the budget is spent and the failure is a LockTimeout, per the contract.
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("no_such_dir/data.json");

    let options = LockOptions {
        timeout: Duration::from_millis(10),
        attempts: 2,
        retry_delay: Duration::from_millis(5),
        poll_interval: Duration::from_millis(5),
    };

    let err = lock(&target, &options).unwrap_err();
    assert!(matches!(err, FilekitError::LockTimeout(_)));
    assert!(err.to_string().contains("2 attempts"));
}

#[test]
fn zero_attempts_still_tries_once() {
    let temp = TempDir::new().unwrap();
    let target = target_in(&temp, "data.json");

    let options = LockOptions {
        attempts: 0,
        ..fast_options()
    };

    let guard = lock(&target, &options).unwrap();
    guard.release().unwrap();
}
