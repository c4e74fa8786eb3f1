//! Install command implementation
//!
//! Runs the same scan as `pyreqs scan`, writes the manifest, then drives
//! the environment collaborator:
//! 1. Reuse a discovered venv (or the one given with `--venv`), else create
//!    `.venv`
//! 2. Upgrade pip (best-effort)
//! 3. List the packages and gate on explicit confirmation
//! 4. Install each package, reporting per-package success or failure
//!
//! Install failures never invalidate the manifest produced by the scan.

use std::path::PathBuf;

use console::Style;
use inquire::Confirm;

use crate::cli::InstallArgs;
use crate::commands::scan;
use crate::error::Result;
use crate::progress::ProgressDisplay;
use crate::venv::{InstallOutcome, PackageInstaller, PipInstaller, VirtualEnv};

/// Run install command
pub fn run(path: Option<PathBuf>, args: InstallArgs, verbose: bool) -> Result<()> {
    let root = scan::resolve_root(path)?;
    println!(
        "Scanning {}",
        Style::new().bold().apply_to(root.display().to_string())
    );

    // Resolve the target env up front so the scan's registry snapshot
    // reads the env packages will actually be installed into
    let target_venv = args.venv.as_deref().map(|dir| scan::absolute_in(&root, dir));

    let outcome = scan::execute(&root, &args.scan, target_venv.as_deref())?;
    let manifest = scan::manifest_path(&root, &args.scan.output);
    outcome.result.write_requirements(&manifest)?;
    scan::print_summary(&outcome, &manifest, verbose);
    println!();

    let venv = match &target_venv {
        Some(dir) => VirtualEnv::ensure_at(dir)?,
        None => VirtualEnv::ensure(&root)?,
    };
    if venv.created {
        println!("Created new virtual environment: {}", venv.path.display());
    } else {
        println!("Using existing virtual environment: {}", venv.path.display());
    }

    if outcome.result.is_empty() {
        println!("No third-party packages to install.");
        return Ok(());
    }

    println!("Upgrading pip...");
    if !venv.upgrade_pip() {
        println!("Failed to upgrade pip. Continuing with installation...");
    }

    let packages: Vec<String> = outcome.result.names().map(str::to_string).collect();
    println!("\nThe following packages will be installed:");
    for package in &packages {
        println!("  - {package}");
    }

    if !args.yes && !confirm_install()? {
        println!("Installation cancelled.");
        return Ok(());
    }

    println!("Installing packages into '{}'...", venv.path.display());
    let installer = PipInstaller::new(&venv);
    let outcomes = install_with_progress(&installer, &packages);
    report_outcomes(&outcomes);

    Ok(())
}

fn confirm_install() -> Result<bool> {
    Confirm::new("Proceed with the installation?")
        .with_default(true)
        .with_help_message("Press Enter to confirm, or 'n' to cancel")
        .prompt()
        .map_err(Into::into)
}

/// Install one package at a time so the progress bar tracks real work
fn install_with_progress(
    installer: &dyn PackageInstaller,
    packages: &[String],
) -> Vec<InstallOutcome> {
    let progress = ProgressDisplay::new(packages.len() as u64);
    let mut outcomes = Vec::with_capacity(packages.len());
    for package in packages {
        progress.update_package(package);
        outcomes.extend(installer.install(std::slice::from_ref(package)));
        progress.inc();
    }
    progress.finish();
    outcomes
}

fn report_outcomes(outcomes: &[InstallOutcome]) {
    let failures: Vec<&InstallOutcome> = outcomes.iter().filter(|o| o.is_failure()).collect();
    for outcome in outcomes {
        match outcome {
            InstallOutcome::Installed { package } => {
                println!(
                    "  {} {package}",
                    Style::new().green().apply_to("installed")
                );
            }
            InstallOutcome::Failed { package, reason } => {
                println!(
                    "  {} {package}: {reason}",
                    Style::new().red().apply_to("failed")
                );
            }
        }
    }

    if failures.is_empty() {
        println!("Done! Your virtual environment is ready.");
    } else {
        println!(
            "{} {} package(s) failed to install; the manifest is still valid.",
            Style::new().yellow().bold().apply_to("Note:"),
            failures.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedInstaller;

    impl PackageInstaller for ScriptedInstaller {
        fn install(&self, packages: &[String]) -> Vec<InstallOutcome> {
            packages
                .iter()
                .map(|package| {
                    if package.starts_with("bad") {
                        InstallOutcome::Failed {
                            package: package.clone(),
                            reason: "no matching distribution".to_string(),
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
    fn test_install_with_progress_keeps_package_order() {
        let packages = vec![
            "alpha".to_string(),
            "bad-pkg".to_string(),
            "zeta".to_string(),
        ];
        let outcomes = install_with_progress(&ScriptedInstaller, &packages);
        let names: Vec<&str> = outcomes.iter().map(InstallOutcome::package).collect();
        assert_eq!(names, vec!["alpha", "bad-pkg", "zeta"]);
        assert!(outcomes[1].is_failure());
    }

    #[test]
    fn test_install_with_progress_empty_list() {
        let outcomes = install_with_progress(&ScriptedInstaller, &[]);
        assert!(outcomes.is_empty());
    }
}
