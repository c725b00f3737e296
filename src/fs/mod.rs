//! Filesystem operations.
//!
//! Helpers over `std::fs` that fill in the steps callers always end up writing
//! by hand: creating destination directories before copies and moves, clearing
//! read-only bits before deletes, and writing files atomically so readers
//! never observe a partial file.

pub mod atomic;
mod ops;
mod walk;

pub use atomic::{atomic_write, atomic_write_file};
pub use ops::{
    copy_file, ensure_dir, is_writable, move_file, remove_dir_all_force, remove_file,
    temp_file_path,
};
pub use walk::{
    TimeKind, dir_size, format_file_time, list_dirs, list_files, modified_within, trees_equal,
};
