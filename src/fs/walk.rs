//! Directory walking and inspection helpers.

use crate::error::{FilekitError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Which file timestamp to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    Modified,
    Created,
    Accessed,
}

/// List files in a directory.
///
/// Non-recursive by default. `extensions` filters by file extension
/// (case-insensitive, with or without a leading dot); pass an empty slice for
/// no filtering. Results are deduplicated and in directory order.
pub fn list_files<P: AsRef<Path>>(
    dir: P,
    extensions: &[&str],
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let mut files = Vec::new();
    collect_entries(dir.as_ref(), recursive, &mut |path| {
        if path.is_dir() {
            return;
        }
        if wanted.is_empty() || matches_extension(&path, &wanted) {
            files.push(path);
        }
    })?;

    let mut seen = HashSet::new();
    files.retain(|p| seen.insert(p.clone()));
    Ok(files)
}

/// List subdirectories of a directory, non-recursive unless asked.
pub fn list_dirs<P: AsRef<Path>>(dir: P, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    collect_entries(dir.as_ref(), recursive, &mut |path| {
        if path.is_dir() {
            dirs.push(path);
        }
    })?;
    Ok(dirs)
}

/// Total size in bytes of all files under a directory.
pub fn dir_size<P: AsRef<Path>>(dir: P) -> Result<u64> {
    let mut total = 0;
    let mut io_error = None;

    collect_entries(dir.as_ref(), true, &mut |path| {
        if path.is_file() {
            match fs::metadata(&path) {
                Ok(meta) => total += meta.len(),
                Err(e) => {
                    io_error.get_or_insert_with(|| {
                        FilekitError::ResourceError(format!(
                            "failed to stat '{}': {}",
                            path.display(),
                            e
                        ))
                    });
                }
            }
        }
    })?;

    match io_error {
        Some(err) => Err(err),
        None => Ok(total),
    }
}

/// True if the file was modified within the last `window`.
pub fn modified_within<P: AsRef<Path>>(path: P, window: Duration) -> Result<bool> {
    let path = path.as_ref();
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| {
            FilekitError::ResourceError(format!(
                "failed to read modification time of '{}': {}",
                path.display(),
                e
            ))
        })?;

    let elapsed = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    Ok(elapsed <= window)
}

/// Format a file timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_file_time<P: AsRef<Path>>(path: P, kind: TimeKind) -> Result<String> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| {
        FilekitError::ResourceError(format!("failed to stat '{}': {}", path.display(), e))
    })?;

    let time = match kind {
        TimeKind::Modified => metadata.modified(),
        TimeKind::Created => metadata.created(),
        TimeKind::Accessed => metadata.accessed(),
    }
    .map_err(|e| {
        FilekitError::ResourceError(format!(
            "timestamp not available for '{}': {}",
            path.display(),
            e
        ))
    })?;

    let datetime: DateTime<Utc> = time.into();
    Ok(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Compare two directory trees.
///
/// With `check_contents` false, trees are equal when they contain the same
/// set of relative file paths. With it true, file bytes must match as well.
pub fn trees_equal<P: AsRef<Path>, Q: AsRef<Path>>(
    dir1: P,
    dir2: Q,
    check_contents: bool,
) -> Result<bool> {
    let dir1 = dir1.as_ref();
    let dir2 = dir2.as_ref();

    let files1 = relative_files(dir1)?;
    let files2 = relative_files(dir2)?;

    if files1 != files2 {
        return Ok(false);
    }

    if check_contents {
        for relative in &files1 {
            if read_for_compare(dir1, relative)? != read_for_compare(dir2, relative)? {
                return Ok(false);
            }
        }
    }

    Ok(true)
}

fn read_for_compare(base: &Path, relative: &Path) -> Result<Vec<u8>> {
    let path = base.join(relative);
    fs::read(&path).map_err(|e| {
        FilekitError::ResourceError(format!("failed to read '{}': {}", path.display(), e))
    })
}

fn relative_files(base: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_entries(base, true, &mut |path| {
        if path.is_file()
            && let Ok(relative) = path.strip_prefix(base)
        {
            files.push(relative.to_path_buf());
        }
    })?;
    files.sort();
    Ok(files)
}

/// Walk `dir`, calling `visit` for every entry. Recurses when asked.
fn collect_entries(
    dir: &Path,
    recursive: bool,
    visit: &mut impl FnMut(PathBuf),
) -> Result<()> {
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
        let is_dir = path.is_dir();
        visit(path.clone());

        if recursive && is_dir {
            collect_entries(&path, true, visit)?;
        }
    }

    Ok(())
}

fn matches_extension(path: &Path, wanted: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| wanted.iter().any(|w| e.eq_ignore_ascii_case(w)))
}
