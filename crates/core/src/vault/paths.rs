//! Path normalisation for index keys.
//!
//! Every document is stored under a lexically cleaned absolute path. No
//! filesystem access happens here, so keys stay stable even after a file
//! has been deleted.

use std::path::{Component, Path, PathBuf};

/// Lexically clean a path: drop `.` segments and fold `..` into its parent.
///
/// A `..` that would climb above the root of an absolute path is discarded;
/// leading `..` segments of a relative path are kept.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
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

/// Make a vault root absolute (against the working directory) and clean it.
pub fn absolute_root(root: &Path) -> PathBuf {
    clean(&std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf()))
}

/// Resolve `path` against `root` and clean the result.
pub fn canonical_key(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() { clean(path) } else { clean(&root.join(path)) }
}

/// Check whether any directory segment of `path` (relative to `root`)
/// case-insensitively matches one of the ignored folder names.
pub fn is_ignored(root: &Path, path: &Path, ignored_folders: &[String]) -> bool {
    if ignored_folders.is_empty() {
        return false;
    }

    let relative = path.strip_prefix(root).unwrap_or(path);
    let Some(parent) = relative.parent() else {
        return false;
    };

    parent.components().any(|component| match component {
        Component::Normal(segment) => {
            let segment = segment.to_string_lossy().to_lowercase();
            ignored_folders.iter().any(|name| name.to_lowercase() == segment)
        }
        _ => false,
    })
}

/// Check whether any segment of a vault-relative path is hidden (dot-prefixed).
pub fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|component| {
        matches!(component, Component::Normal(s) if s.to_string_lossy().starts_with('.'))
    })
}

pub fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Lowercased filename without a trailing `.md`, used for title lookups.
pub fn note_stem(reference: &str) -> Option<String> {
    let name = reference.trim().rsplit(['/', '\\']).next()?;
    let lower = name.to_lowercase();
    let stem = lower.strip_suffix(".md").unwrap_or(&lower);
    if stem.is_empty() { None } else { Some(stem.to_string()) }
}
