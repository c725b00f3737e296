//! Filekit: filesystem helper toolkit.
//!
//! A grab-bag of small, stateless helpers around path manipulation, file and
//! directory operations, JSON persistence, and host introspection, plus one
//! piece with a real contract: the exclusive file-locking helpers in [`lock`].
//!
//! The locking helpers coordinate access to shared files across processes via
//! advisory lock artifacts on disk. All participants must use them for
//! exclusivity to hold; the lock does not stop a process that ignores it.

pub mod error;
pub mod fs;
pub mod lock;
pub mod paths;
pub mod serialize;
pub mod system;

pub use error::{FilekitError, Result};
pub use lock::{LockGuard, LockOptions, LockedFile, break_lock, lock, open_exclusive};
