//! Path string helpers.
//!
//! These exist to make common path juggling more readable: environment
//! variable expansion, lexical normalization, extension swaps, and shortening
//! long paths for display. All functions are pure; nothing here touches the
//! filesystem.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// Regex pattern for environment variable references: `$VAR`, `${VAR}`, `%VAR%`.
static ENV_VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?<braced>[A-Za-z_][A-Za-z0-9_]*)\}|\$(?<plain>[A-Za-z_][A-Za-z0-9_]*)|%(?<win>[A-Za-z_][A-Za-z0-9_]*)%")
        .expect("Invalid env var regex")
});

/// Expand environment variable references in a path string.
///
/// Supports `$VAR`, `${VAR}`, and `%VAR%` forms. References to variables that
/// are not set are left untouched, matching shell-style expansion.
pub fn expand(path: &str) -> String {
    ENV_VAR_REGEX
        .replace_all(path, |caps: &regex::Captures| {
            let name = caps
                .name("braced")
                .or_else(|| caps.name("plain"))
                .or_else(|| caps.name("win"))
                .map(|m| m.as_str())
                .unwrap_or_default();

            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .to_string()
}

/// Expand environment variables and normalize, in one step.
pub fn expand_norm(path: &str) -> PathBuf {
    normalize(Path::new(&expand(path)))
}

/// Lexically normalize a path.
///
/// Collapses `.` components and resolves `..` against preceding normal
/// components, without consulting the filesystem. `..` at the start of a
/// relative path is preserved since there is nothing to resolve it against.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    parts.iter().collect()
}

/// Join path segments into a normalized path.
///
/// Unlike plain `Path::join`, later segments with leading separators do not
/// reset the path back to the root; stray separators are trimmed instead.
pub fn join<I, S>(segments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = PathBuf::new();

    for (i, segment) in segments.into_iter().enumerate() {
        let segment = segment.as_ref();
        if i == 0 {
            joined.push(segment);
        } else {
            joined.push(segment.trim_matches(['/', '\\']));
        }
    }

    normalize(joined)
}

/// Get the file name of a path, with or without its extension.
///
/// Returns an empty string for paths without a file name component.
pub fn name<P: AsRef<Path>>(path: P, include_ext: bool) -> String {
    let path = path.as_ref();
    let part = if include_ext {
        path.file_name()
    } else {
        path.file_stem()
    };

    part.map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Get the extension of a path, without the leading dot.
pub fn ext<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_string())
}

/// Replace the extension of a path. A leading dot on `new_ext` is optional.
pub fn change_ext<P: AsRef<Path>>(path: P, new_ext: &str) -> PathBuf {
    path.as_ref()
        .with_extension(new_ext.trim_start_matches('.'))
}

/// Strip the extension from a path, if it has one.
pub fn remove_ext<P: AsRef<Path>>(path: P) -> PathBuf {
    path.as_ref().with_extension("")
}

/// Split a path into its components as strings.
pub fn split_all<P: AsRef<Path>>(path: P) -> Vec<String> {
    path.as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect()
}

/// Shorten a path for display, keeping the file name and as many trailing
/// directory components as fit in `max_chars`. Elided middle components are
/// replaced with `...`.
pub fn humanize<P: AsRef<Path>>(path: P, max_chars: usize) -> String {
    let mut parts = split_all(&path);
    let Some(file_name) = parts.pop() else {
        return String::new();
    };

    let mut budget = max_chars as isize - file_name.len() as isize;
    let mut kept = vec![file_name];

    for part in parts.iter().rev() {
        budget -= part.len() as isize;
        if budget < 0 {
            kept.push("...".to_string());
            break;
        }
        kept.push(part.clone());
    }

    kept.reverse();
    kept.iter().collect::<PathBuf>().to_string_lossy().to_string()
}
