//! Import scanning pipeline
//!
//! Drives the per-file pipeline over a project root:
//! 1. Walk the tree for Python source files (`walker`)
//! 2. Decode each file, detecting its encoding when needed (`reader`)
//! 3. Extract import declarations from the text (`extractor`)
//! 4. Resolve each import to a pip package (`crate::resolver`)
//! 5. Accumulate resolved packages into the manifest (`crate::manifest`)
//!
//! Per-file and per-import problems become [`Warning`] values and never abort
//! the scan; only an inaccessible root is fatal.

pub mod extractor;
pub mod reader;
pub mod walker;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PyreqsError, Result};
use crate::manifest::{ManifestBuilder, ScanResult};
use crate::resolver::{ResolutionSource, Resolver};

/// Category of a non-fatal problem encountered during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Could not descend into part of the tree
    Traversal,
    /// Could not decode a source file
    Decode,
    /// Import resolved only via the identity fallback
    Unverified,
    /// Package mapping file problems that did not abort the scan
    Mapping,
}

/// A non-fatal problem, reported after the scan summary
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Everything a scan produced: the manifest plus accumulated warnings
#[derive(Debug)]
pub struct ScanOutcome {
    pub result: ScanResult,
    pub warnings: Vec<Warning>,
    pub files_scanned: usize,
    pub imports_seen: usize,
}

/// Scans a project root and resolves its third-party imports
pub struct Scanner {
    root: PathBuf,
    resolver: Resolver,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, resolver: Resolver) -> Self {
        Self {
            root: root.into(),
            resolver,
        }
    }

    /// Run the full pipeline over the root directory
    pub fn run(&self) -> Result<ScanOutcome> {
        if !self.root.is_dir() {
            return Err(PyreqsError::RootNotFound {
                path: self.root.display().to_string(),
            });
        }

        let mut builder = ManifestBuilder::new();
        let mut warnings: Vec<Warning> = Vec::new();
        let mut files_scanned = 0usize;
        let mut imports_seen = 0usize;
        // Each unresolved import name warns once, not once per file
        let mut warned_unverified: HashSet<String> = HashSet::new();

        for entry in walker::source_files(&self.root) {
            let path = match entry {
                Ok(path) => path,
                Err(warning) => {
                    warnings.push(warning);
                    continue;
                }
            };

            let text = match reader::read_source(&path) {
                Ok(text) => text,
                Err(err) => {
                    warnings.push(Warning::new(
                        WarningKind::Decode,
                        format!("Skipped {}: {err}", self.display_path(&path)),
                    ));
                    continue;
                }
            };

            files_scanned += 1;
            for decl in extractor::extract_imports(&text) {
                imports_seen += 1;
                let Some(resolution) = self.resolver.resolve(&decl.name) else {
                    continue;
                };
                builder.add(
                    &resolution.package,
                    &decl.name,
                    resolution.source != ResolutionSource::Identity,
                );
                if resolution.source == ResolutionSource::Identity
                    && warned_unverified.insert(decl.name.clone())
                {
                    warnings.push(Warning::new(
                        WarningKind::Unverified,
                        format!(
                            "'{}' not found in any mapping source; assuming package name '{}' ({}:{})",
                            decl.name,
                            resolution.package,
                            self.display_path(&path),
                            decl.line
                        ),
                    ));
                }
            }
        }

        Ok(ScanOutcome {
            result: builder.finish(),
            warnings,
            files_scanned,
            imports_seen,
        })
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
