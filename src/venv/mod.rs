//! Virtual environment management
//!
//! Discovers or creates a virtualenv under the project root and installs
//! packages into it through the venv's own pip. Installation is a
//! capability behind the [`PackageInstaller`] trait so the command layer
//! can be exercised with a fake; the real implementation shells out to pip
//! once per package and reports a per-package outcome. Install failures are
//! reported, never escalated into scan failures.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{PyreqsError, Result};

/// Directory names probed when looking for an existing environment
pub const VENV_CANDIDATES: &[&str] = &[".venv", "venv", "myenv"];

/// Name used when a new environment has to be created
const DEFAULT_VENV: &str = ".venv";

/// Result of installing one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { package: String },
    Failed { package: String, reason: String },
}

impl InstallOutcome {
    pub fn package(&self) -> &str {
        match self {
            InstallOutcome::Installed { package } | InstallOutcome::Failed { package, .. } => {
                package
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, InstallOutcome::Failed { .. })
    }
}

/// Capability to install a list of packages, one outcome per package
pub trait PackageInstaller {
    fn install(&self, packages: &[String]) -> Vec<InstallOutcome>;
}

/// A discovered or freshly created virtual environment
#[derive(Debug, Clone)]
pub struct VirtualEnv {
    pub path: PathBuf,
    pub created: bool,
}

impl VirtualEnv {
    /// Use an existing environment directory as-is
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            created: false,
        }
    }

    /// Use the environment at `path`, creating it when missing
    pub fn ensure_at(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(Self::at(path.to_path_buf()));
        }
        create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            created: true,
        })
    }

    /// Reuse the first existing candidate under `root`, or create `.venv`
    pub fn ensure(root: &Path) -> Result<Self> {
        if let Some(existing) = find_existing(root) {
            return Ok(Self::at(existing));
        }
        let path = root.join(DEFAULT_VENV);
        create(&path)?;
        Ok(Self {
            path,
            created: true,
        })
    }

    fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.path.join("Scripts")
        } else {
            self.path.join("bin")
        }
    }

    pub fn python(&self) -> PathBuf {
        self.bin_dir().join(if cfg!(windows) { "python.exe" } else { "python" })
    }

    pub fn pip(&self) -> PathBuf {
        self.bin_dir().join(if cfg!(windows) { "pip.exe" } else { "pip" })
    }

    /// Upgrade pip inside the environment; best-effort, failure is reported
    /// by the caller as a warning
    pub fn upgrade_pip(&self) -> bool {
        Command::new(self.python())
            .args(["-m", "pip", "install", "--upgrade", "pip"])
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// First existing candidate venv directory under `root`
pub fn find_existing(root: &Path) -> Option<PathBuf> {
    VENV_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_dir())
}

fn create(path: &Path) -> Result<()> {
    let python = if cfg!(windows) { "python" } else { "python3" };
    let status = Command::new(python)
        .args(["-m", "venv"])
        .arg(path)
        .status()
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => PyreqsError::PythonNotFound,
            _ => PyreqsError::VenvCreateFailed {
                path: path.display().to_string(),
                reason: err.to_string(),
            },
        })?;
    if !status.success() {
        return Err(PyreqsError::VenvCreateFailed {
            path: path.display().to_string(),
            reason: format!("{python} -m venv exited with {status}"),
        });
    }
    Ok(())
}

/// Installs packages through the venv's pip, one invocation per package so
/// a broken package cannot sink the rest of the list
pub struct PipInstaller<'a> {
    venv: &'a VirtualEnv,
}

impl<'a> PipInstaller<'a> {
    pub fn new(venv: &'a VirtualEnv) -> Self {
        Self { venv }
    }
}

impl PackageInstaller for PipInstaller<'_> {
    fn install(&self, packages: &[String]) -> Vec<InstallOutcome> {
        packages
            .iter()
            .map(|package| {
                let output = Command::new(self.venv.pip())
                    .args(["install", package])
                    .output();
                match output {
                    Ok(output) if output.status.success() => InstallOutcome::Installed {
                        package: package.clone(),
                    },
                    Ok(output) => InstallOutcome::Failed {
                        package: package.clone(),
                        reason: String::from_utf8_lossy(&output.stderr)
                            .lines()
                            .last()
                            .unwrap_or("pip failed")
                            .to_string(),
                    },
                    Err(err) => InstallOutcome::Failed {
                        package: package.clone(),
                        reason: err.to_string(),
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_existing_prefers_dot_venv() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("venv")).unwrap();
        fs::create_dir(temp.path().join(".venv")).unwrap();

        let found = find_existing(temp.path()).unwrap();
        assert!(found.ends_with(".venv"));
    }

    #[test]
    fn test_find_existing_falls_back_to_alternatives() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("myenv")).unwrap();

        let found = find_existing(temp.path()).unwrap();
        assert!(found.ends_with("myenv"));
    }

    #[test]
    fn test_find_existing_ignores_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".venv"), "not a dir").unwrap();

        assert_eq!(find_existing(temp.path()), None);
    }

    #[test]
    fn test_ensure_reuses_existing() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("venv")).unwrap();

        let venv = VirtualEnv::ensure(temp.path()).unwrap();
        assert!(!venv.created);
        assert!(venv.path.ends_with("venv"));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = InstallOutcome::Installed {
            package: "numpy".to_string(),
        };
        let bad = InstallOutcome::Failed {
            package: "ghost".to_string(),
            reason: "no matching distribution".to_string(),
        };
        assert_eq!(ok.package(), "numpy");
        assert!(!ok.is_failure());
        assert!(bad.is_failure());
    }

    struct FakeInstaller {
        fail: &'static str,
    }

    impl PackageInstaller for FakeInstaller {
        fn install(&self, packages: &[String]) -> Vec<InstallOutcome> {
            packages
                .iter()
                .map(|package| {
                    if package == self.fail {
                        InstallOutcome::Failed {
                            package: package.clone(),
                            reason: "simulated".to_string(),
                        }
                    } else {
                        InstallOutcome::Installed {
                            package: package.clone(),
                        }
                    }
                })
                .collect()
        }
    }

    #[test]
    fn test_installer_trait_reports_per_package_outcomes() {
        let installer = FakeInstaller { fail: "ghost" };
        let outcomes = installer.install(&[
            "numpy".to_string(),
            "ghost".to_string(),
            "flask".to_string(),
        ]);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|o| o.is_failure()).count(), 1);
        assert_eq!(outcomes[1].package(), "ghost");
    }
}
