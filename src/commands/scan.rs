//! Scan command implementation
//!
//! Runs the import-scanning pipeline and writes the requirements manifest:
//! 1. Load the package mapping (user overrides over built-ins)
//! 2. Snapshot the installed registry from the target or discovered venv
//! 3. Walk, decode, extract and resolve
//! 4. Write the manifest and print the summary, warnings last
//!
//! The manifest is written regardless of warnings; only a bad mapping file
//! or a missing root aborts.

use std::path::{Path, PathBuf};

use console::Style;

use crate::cli::ScanArgs;
use crate::error::Result;
use crate::resolver::Resolver;
use crate::resolver::mapping::{DEFAULT_MAPPING_FILE, PackageMapping};
use crate::resolver::registry::InstalledRegistry;
use crate::scanner::{ScanOutcome, Scanner, Warning, WarningKind};
use crate::venv;

/// Run scan command
pub fn run(path: Option<PathBuf>, args: ScanArgs, verbose: bool) -> Result<()> {
    let root = resolve_root(path)?;
    println!(
        "Scanning {}",
        Style::new().bold().apply_to(root.display().to_string())
    );

    let outcome = execute(&root, &args, None)?;
    let manifest = manifest_path(&root, &args.output);
    outcome.result.write_requirements(&manifest)?;

    print_summary(&outcome, &manifest, verbose);
    Ok(())
}

/// Scan `root` without writing anything; shared with the install command.
///
/// The registry snapshot comes from `target_venv` when given (the install
/// command's `--venv`), else from a venv discovered under the root.
pub(crate) fn execute(
    root: &Path,
    args: &ScanArgs,
    target_venv: Option<&Path>,
) -> Result<ScanOutcome> {
    let (mapping, mapping_warning) = load_mapping(root, args.mapping.as_deref())?;

    let registry = match target_venv
        .map(Path::to_path_buf)
        .or_else(|| venv::find_existing(root))
    {
        Some(venv_dir) => InstalledRegistry::from_venv(&venv_dir),
        None => InstalledRegistry::empty(),
    };

    let scanner = Scanner::new(root, Resolver::new(mapping, registry));
    let mut outcome = scanner.run()?;
    if let Some(warning) = mapping_warning {
        outcome.warnings.insert(0, warning);
    }
    Ok(outcome)
}

/// Load overrides from `--mapping`, or from `package_mapping.json` in the
/// root. Only the default file may be missing without error.
fn load_mapping(
    root: &Path,
    explicit: Option<&Path>,
) -> Result<(PackageMapping, Option<Warning>)> {
    if let Some(path) = explicit {
        let path = absolute_in(root, path);
        return Ok((PackageMapping::load(&path)?, None));
    }

    let default = root.join(DEFAULT_MAPPING_FILE);
    if default.is_file() {
        Ok((PackageMapping::load(&default)?, None))
    } else {
        Ok((
            PackageMapping::built_in(),
            Some(Warning::new(
                WarningKind::Mapping,
                format!("{DEFAULT_MAPPING_FILE} not found; using built-in mapping only"),
            )),
        ))
    }
}

pub(crate) fn resolve_root(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(Into::into),
    }
}

pub(crate) fn manifest_path(root: &Path, output: &Path) -> PathBuf {
    absolute_in(root, output)
}

pub(crate) fn absolute_in(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

pub(crate) fn print_summary(outcome: &ScanOutcome, manifest: &Path, verbose: bool) {
    println!(
        "Scanned {} file(s), {} import statement(s)",
        outcome.files_scanned, outcome.imports_seen
    );
    println!(
        "{} {} with {} package(s)",
        Style::new().green().bold().apply_to("Wrote"),
        manifest.display(),
        outcome.result.len()
    );
    for package in outcome.result.packages() {
        if verbose {
            let imports: Vec<&str> = package.imported_as.iter().map(String::as_str).collect();
            println!("  - {} (imported as {})", package.name, imports.join(", "));
        } else {
            println!("  - {}", package.name);
        }
    }

    if !outcome.warnings.is_empty() {
        println!();
        println!("{}", Style::new().yellow().bold().apply_to("Warnings:"));
        for warning in &outcome.warnings {
            println!("  - {warning}");
        }
    }
}
