//! Source file discovery
//!
//! Walks a project root recursively and yields every `.py` file, pruning
//! virtual-environment, version-control and build-cache directories at
//! traversal time. Walk errors (typically permissions) skip the affected
//! subtree and surface as warnings.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{Warning, WarningKind};

/// Directory names never descended into
const EXCLUDED_DIRS: &[&str] = &[
    ".venv",
    "venv",
    "myenv",
    ".git",
    ".hg",
    ".svn",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".tox",
    ".eggs",
    "node_modules",
];

fn is_excluded_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    EXCLUDED_DIRS.contains(&name.as_ref()) || name.ends_with(".egg-info")
}

fn is_python_source(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("py"))
}

/// Lazily enumerate Python source files under `root`
pub fn source_files(root: &Path) -> impl Iterator<Item = Result<PathBuf, Warning>> + use<> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
        .filter_map(|entry| match entry {
            Ok(entry) if is_python_source(&entry) => Some(Ok(entry.path().to_path_buf())),
            Ok(_) => None,
            Err(err) => {
                let path = err
                    .path()
                    .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
                Some(Err(Warning::new(
                    WarningKind::Traversal,
                    format!("Skipped {path}: {err}"),
                )))
            }
        })
}
