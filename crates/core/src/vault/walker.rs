//! Recursive vault directory walker.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::paths::{self, is_markdown_file};

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),
}

/// Information about a discovered markdown file.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Absolute path to the file (root joined, not symlink-resolved).
    pub absolute_path: PathBuf,
    /// Path relative to vault root.
    pub relative_path: PathBuf,
}

/// Walker for discovering markdown files in a vault.
#[derive(Debug)]
pub struct VaultWalker {
    root: PathBuf,
    /// Folder names to skip at any depth, matched case-insensitively.
    ignored_folders: Vec<String>,
}

impl VaultWalker {
    /// Create a new walker for the given vault root.
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        Self::with_ignored(root, &[])
    }

    /// Create a new walker that skips any directory whose name matches one
    /// of `ignored_folders`.
    pub fn with_ignored(
        root: &Path,
        ignored_folders: &[String],
    ) -> Result<Self, VaultWalkerError> {
        let root = paths::absolute_root(root);
        if !root.is_dir() {
            return Err(VaultWalkerError::MissingRoot(root.display().to_string()));
        }

        let ignored_folders = ignored_folders.iter().map(|f| f.to_lowercase()).collect();
        Ok(Self { root, ignored_folders })
    }

    /// Walk the vault and return all markdown files sorted by relative path.
    /// Excludes hidden directories and the configured ignored folders.
    pub fn walk(&self) -> Result<Vec<WalkedFile>, VaultWalkerError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Entries removed mid-walk are not an error.
                Err(e) if is_not_found(&e) => continue,
                Err(e) => {
                    return Err(VaultWalkerError::WalkError(
                        self.root.display().to_string(),
                        e,
                    ));
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let relative_path =
                path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

            files.push(WalkedFile {
                absolute_path: path.to_path_buf(),
                relative_path,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Check if an entry should be excluded from walking.
    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        // Never filter the root directory (depth 0)
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return true;
        }

        let lower = name.to_lowercase();
        self.ignored_folders.iter().any(|ignored| *ignored == lower)
    }

    /// Get the vault root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_not_found(e: &walkdir::Error) -> bool {
    e.io_error().is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("note1.md"), "# Note 1").unwrap();
        fs::write(root.join("note2.md"), "# Note 2").unwrap();

        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/note3.md"), "# Note 3").unwrap();

        // Hidden directory (should be skipped)
        fs::create_dir(root.join(".hidden")).unwrap();
        fs::write(root.join(".hidden/secret.md"), "# Secret").unwrap();

        // Non-markdown file (should be skipped)
        fs::write(root.join("readme.txt"), "Not markdown").unwrap();

        dir
    }

    fn relative_paths(files: &[WalkedFile]) -> Vec<String> {
        files.iter().map(|f| f.relative_path.to_string_lossy().to_string()).collect()
    }

    #[test]
    fn test_walk_finds_markdown_files() {
        let vault = create_test_vault();
        let walker = VaultWalker::new(vault.path()).unwrap();
        let files = walker.walk().unwrap();

        assert_eq!(relative_paths(&files), vec!["note1.md", "note2.md", "subdir/note3.md"]);
        assert!(files.iter().all(|f| f.absolute_path.starts_with(vault.path())));
    }

    #[test]
    fn test_walk_skips_hidden_and_non_markdown() {
        let vault = create_test_vault();
        let files = VaultWalker::new(vault.path()).unwrap().walk().unwrap();
        let paths = relative_paths(&files);

        assert!(!paths.iter().any(|p| p.contains(".hidden")));
        assert!(!paths.iter().any(|p| p.contains("readme.txt")));
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let walker = VaultWalker::new(Path::new("./src/../src")).unwrap();
        assert!(walker.root().is_absolute());
        assert!(walker.root().ends_with("src"));
    }

    #[test]
    fn test_missing_root() {
        let result = VaultWalker::new(Path::new("/nonexistent/path"));
        assert!(matches!(result.unwrap_err(), VaultWalkerError::MissingRoot(_)));
    }

    #[test]
    fn test_walk_with_ignored_folders_at_any_depth() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("note1.md"), "# Note 1").unwrap();
        fs::create_dir_all(root.join("Templates")).unwrap();
        fs::write(root.join("Templates/task.md"), "# Task Template").unwrap();
        fs::create_dir_all(root.join("projects/templates")).unwrap();
        fs::write(root.join("projects/templates/meeting.md"), "# Meeting").unwrap();
        fs::write(root.join("projects/proj.md"), "# Project").unwrap();

        let walker = VaultWalker::with_ignored(root, &["templates".to_string()]).unwrap();
        let files = walker.walk().unwrap();

        assert_eq!(relative_paths(&files), vec!["note1.md", "projects/proj.md"]);
    }
}
