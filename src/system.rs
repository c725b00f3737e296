//! Process and host introspection helpers.
//!
//! Small wrappers used both directly by callers and by the lock metadata to
//! identify which user/host/process is holding a lock.

use crate::error::{FilekitError, Result};
use std::net::{IpAddr, ToSocketAddrs};
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Get the name of the user running this process.
///
/// Falls back through `USER` (POSIX) and `USERNAME` (Windows), then `"unknown"`.
pub fn username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Get the local computer's host name, or `"unknown"` if it cannot be read.
pub fn host_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// `user@host` identifier for the current process.
///
/// Used as the owner field in lock metadata so a contending process can report
/// who is holding a lock.
pub fn owner_string() -> String {
    format!("{}@{}", username(), host_name())
}

/// Resolve the local host name to an IP address.
pub fn local_ip() -> Result<IpAddr> {
    let host = host_name();
    let mut addrs = (host.as_str(), 0u16).to_socket_addrs().map_err(|e| {
        FilekitError::ResourceError(format!("failed to resolve host '{}': {}", host, e))
    })?;

    addrs
        .next()
        .map(|a| a.ip())
        .ok_or_else(|| FilekitError::ResourceError(format!("no address found for host '{}'", host)))
}

/// Spawn a program without waiting for it to finish.
///
/// Stdio is detached so the child cannot block on the parent's pipes. The
/// returned [`Child`] can be ignored for fire-and-forget use.
pub fn spawn_detached<P: AsRef<Path>>(program: P, args: &[&str]) -> Result<Child> {
    Command::new(program.as_ref())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            FilekitError::ResourceError(format!(
                "failed to spawn '{}': {}",
                program.as_ref().display(),
                e
            ))
        })
}
