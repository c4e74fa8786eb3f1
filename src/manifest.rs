//! Manifest accumulation and writing
//!
//! Collects resolved packages across all scanned files, dedupes them
//! case-insensitively (pip treats `Pillow` and `pillow` as the same
//! distribution) and orders them case-insensitively so re-running a scan on
//! an unchanged tree produces byte-identical output.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{PyreqsError, Result};

/// A distribution package plus the import names that resolved to it
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    /// Distribution name, first spelling seen wins
    pub name: String,
    /// Import names that resolved here, for diagnostics
    pub imported_as: BTreeSet<String>,
    /// False when only the identity fallback produced this entry
    pub verified: bool,
}

/// Accumulates resolutions; keyed by lowercased name for dedup and ordering
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    packages: BTreeMap<String, ResolvedPackage>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, package: &str, import_name: &str, verified: bool) {
        let entry = self
            .packages
            .entry(package.to_lowercase())
            .or_insert_with(|| ResolvedPackage {
                name: package.to_string(),
                imported_as: BTreeSet::new(),
                verified: false,
            });
        entry.imported_as.insert(import_name.to_string());
        entry.verified |= verified;
    }

    pub fn finish(self) -> ScanResult {
        ScanResult {
            packages: self.packages.into_values().collect(),
        }
    }
}

/// Final ordered list of distinct distribution packages for a project root
#[derive(Debug)]
pub struct ScanResult {
    packages: Vec<ResolvedPackage>,
}

impl ScanResult {
    pub fn packages(&self) -> &[ResolvedPackage] {
        &self.packages
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Serialize one package name per line, overwriting `path`
    pub fn write_requirements(&self, path: &Path) -> Result<()> {
        let mut content = String::new();
        for name in self.names() {
            content.push_str(name);
            content.push('\n');
        }
        std::fs::write(path, content).map_err(|err| PyreqsError::ManifestWriteFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dedupe_and_sort_case_insensitive() {
        let mut builder = ManifestBuilder::new();
        builder.add("Pillow", "PIL", true);
        builder.add("numpy", "numpy", false);
        builder.add("pillow", "PIL", true);
        builder.add("Flask", "flask", false);

        let result = builder.finish();
        let names: Vec<&str> = result.names().collect();
        assert_eq!(names, vec!["Flask", "numpy", "Pillow"]);
    }

    #[test]
    fn test_first_spelling_wins() {
        let mut builder = ManifestBuilder::new();
        builder.add("PyYAML", "yaml", true);
        builder.add("pyyaml", "yaml", true);

        let names: Vec<String> = builder.finish().names().map(str::to_string).collect();
        assert_eq!(names, vec!["PyYAML"]);
    }

    #[test]
    fn test_imported_as_collects_all_imports() {
        let mut builder = ManifestBuilder::new();
        builder.add("opencv-python", "cv2", true);
        builder.add("opencv-python", "cv2.typing", true);

        let result = builder.finish();
        let package = &result.packages()[0];
        assert_eq!(package.imported_as.len(), 2);
    }

    #[test]
    fn test_verified_sticks_once_set() {
        let mut builder = ManifestBuilder::new();
        builder.add("requests", "requests", false);
        builder.add("requests", "requests", true);

        assert!(builder.finish().packages()[0].verified);
    }

    #[test]
    fn test_write_requirements_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");

        let mut builder = ManifestBuilder::new();
        builder.add("mediapipe", "mediapipe", false);
        builder.add("opencv-python", "cv2", true);
        builder.add("Pillow", "PIL", true);
        builder.finish().write_requirements(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "mediapipe\nopencv-python\nPillow\n");
    }

    #[test]
    fn test_write_requirements_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");
        std::fs::write(&path, "stale-package\n").unwrap();

        let mut builder = ManifestBuilder::new();
        builder.add("numpy", "numpy", true);
        builder.finish().write_requirements(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "numpy\n");
    }

    #[test]
    fn test_empty_manifest_writes_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");
        ManifestBuilder::new().finish().write_requirements(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
