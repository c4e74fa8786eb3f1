//! Installed-package registry
//!
//! A snapshot of what is already installed in a virtual environment, taken
//! by reading `site-packages/*.dist-info` metadata without running any
//! Python. Maps top-level import names (from `top_level.txt`, falling back
//! to `RECORD` entries) to the distribution `Name:` in `METADATA`, so that
//! an import matching an installed package resolves to the exact name it
//! was installed under.
//!
//! Everything here is best-effort: a venv with unreadable metadata simply
//! contributes fewer entries, it never fails the scan.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Import-name to distribution-name snapshot
pub struct InstalledRegistry {
    modules: HashMap<String, String>,
}

impl InstalledRegistry {
    /// Registry with no installed packages (no venv found)
    pub fn empty() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Snapshot the distributions installed in a virtual environment
    pub fn from_venv(venv: &Path) -> Self {
        let mut modules = HashMap::new();
        for site_packages in site_packages_dirs(venv) {
            let Ok(entries) = std::fs::read_dir(&site_packages) else {
                continue;
            };
            for entry in entries.filter_map(std::result::Result::ok) {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "dist-info") {
                    index_dist_info(&path, &mut modules);
                }
            }
        }
        Self { modules }
    }

    /// Distribution name for an import, if an installed package provides it
    pub fn lookup(&self, import_name: &str) -> Option<&str> {
        self.modules.get(import_name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    #[cfg(test)]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        Self {
            modules: entries
                .into_iter()
                .map(|(module, dist)| (module.to_string(), dist.to_string()))
                .collect(),
        }
    }
}

/// Candidate site-packages locations inside a venv (unix and windows layouts)
fn site_packages_dirs(venv: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    let windows = venv.join("Lib").join("site-packages");
    if windows.is_dir() {
        dirs.push(windows);
    }

    let lib = venv.join("lib");
    if let Ok(entries) = std::fs::read_dir(&lib) {
        for entry in entries.filter_map(std::result::Result::ok) {
            // lib/python3.12/site-packages
            let candidate = entry.path().join("site-packages");
            if candidate.is_dir() {
                dirs.push(candidate);
            }
        }
    }

    dirs
}

fn index_dist_info(dist_info: &Path, modules: &mut HashMap<String, String>) {
    let Some(name) = distribution_name(dist_info) else {
        return;
    };

    // The distribution name itself often is the import name
    modules.entry(name.clone()).or_insert_with(|| name.clone());

    for module in top_level_modules(dist_info) {
        modules.entry(module).or_insert_with(|| name.clone());
    }
}

/// `Name:` header from the dist-info METADATA file
fn distribution_name(dist_info: &Path) -> Option<String> {
    let metadata = std::fs::read_to_string(dist_info.join("METADATA")).ok()?;
    metadata.lines().find_map(|line| {
        line.strip_prefix("Name:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

/// Importable top-level modules, from top_level.txt when present, otherwise
/// reconstructed from the first path segment of RECORD entries
fn top_level_modules(dist_info: &Path) -> Vec<String> {
    if let Ok(top_level) = std::fs::read_to_string(dist_info.join("top_level.txt")) {
        return top_level
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    let Ok(record) = std::fs::read_to_string(dist_info.join("RECORD")) else {
        return Vec::new();
    };
    let mut modules = Vec::new();
    for line in record.lines() {
        let Some(path) = line.split(',').next() else {
            continue;
        };
        let Some(first) = path.split('/').next() else {
            continue;
        };
        if first.ends_with(".dist-info") || first.starts_with('.') || first.contains("__pycache__")
        {
            continue;
        }
        let module = first.strip_suffix(".py").unwrap_or(first);
        if !module.is_empty() && !modules.iter().any(|m| m == module) {
            modules.push(module.to_string());
        }
    }
    modules
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_venv(temp: &TempDir) -> PathBuf {
        let venv = temp.path().join(".venv");
        fs::create_dir_all(venv.join("lib/python3.12/site-packages")).unwrap();
        venv
    }

    fn add_dist(venv: &Path, dist: &str, version: &str, top_level: Option<&str>) -> PathBuf {
        let dist_info = venv
            .join("lib/python3.12/site-packages")
            .join(format!("{}-{}.dist-info", dist.replace('-', "_"), version));
        fs::create_dir_all(&dist_info).unwrap();
        fs::write(
            dist_info.join("METADATA"),
            format!("Metadata-Version: 2.1\nName: {dist}\nVersion: {version}\n"),
        )
        .unwrap();
        if let Some(top_level) = top_level {
            fs::write(dist_info.join("top_level.txt"), top_level).unwrap();
        }
        dist_info
    }

    #[test]
    fn test_empty_registry() {
        let registry = InstalledRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.lookup("numpy"), None);
    }

    #[test]
    fn test_lookup_via_top_level_txt() {
        let temp = TempDir::new().unwrap();
        let venv = fake_venv(&temp);
        add_dist(&venv, "opencv-python", "4.9.0", Some("cv2\n"));

        let registry = InstalledRegistry::from_venv(&venv);
        assert_eq!(registry.lookup("cv2"), Some("opencv-python"));
        assert_eq!(registry.lookup("opencv-python"), Some("opencv-python"));
    }

    #[test]
    fn test_lookup_via_record_fallback() {
        let temp = TempDir::new().unwrap();
        let venv = fake_venv(&temp);
        let dist_info = add_dist(&venv, "six", "1.16.0", None);
        fs::write(
            dist_info.join("RECORD"),
            "six.py,sha256=abc,123\nsix-1.16.0.dist-info/METADATA,sha256=def,456\n",
        )
        .unwrap();

        let registry = InstalledRegistry::from_venv(&venv);
        assert_eq!(registry.lookup("six"), Some("six"));
    }

    #[test]
    fn test_dist_without_metadata_ignored() {
        let temp = TempDir::new().unwrap();
        let venv = fake_venv(&temp);
        fs::create_dir_all(
            venv.join("lib/python3.12/site-packages/broken-1.0.dist-info"),
        )
        .unwrap();

        let registry = InstalledRegistry::from_venv(&venv);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_venv_yields_empty_registry() {
        let temp = TempDir::new().unwrap();
        let registry = InstalledRegistry::from_venv(&temp.path().join("nope"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_windows_layout() {
        let temp = TempDir::new().unwrap();
        let venv = temp.path().join(".venv");
        let site = venv.join("Lib/site-packages/requests-2.31.0.dist-info");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("METADATA"), "Name: requests\n").unwrap();
        fs::write(site.join("top_level.txt"), "requests\n").unwrap();

        let registry = InstalledRegistry::from_venv(&venv);
        assert_eq!(registry.lookup("requests"), Some("requests"));
    }
}
