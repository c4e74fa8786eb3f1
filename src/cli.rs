//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pyreqs - Python requirements scanner
///
/// Scan a Python source tree for imports and manage their pip requirements.
#[derive(Parser, Debug)]
#[command(
    name = "pyreqs",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Python requirements scanner",
    long_about = "pyreqs statically scans a Python source tree for import statements, \
                  resolves each import to the pip package that provides it, and writes \
                  a deduplicated, sorted requirements.txt. It never executes the scanned code.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  pyreqs scan\n    \
                  pyreqs scan --path ./my-project\n    \
                  pyreqs install\n    \
                  pyreqs install -y\n\n\
                  \x1b[1m\x1b[32mNotes:\x1b[0m\n    \
                  Import names and pip package names frequently differ (cv2 vs opencv-python);\n    \
                  pyreqs resolves them through a mapping file, the installed registry and a\n    \
                  built-in table of well-known discrepancies."
)]
pub struct Cli {
    /// Root directory to scan (defaults to current directory)
    #[arg(long, short = 'p', global = true)]
    pub path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan sources and write the requirements manifest
    Scan(ScanArgs),

    /// Scan, then install the resolved packages into a virtual environment
    Install(InstallArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Scan the current directory:\n    pyreqs scan\n\n\
                  Scan another project:\n    pyreqs scan --path ../other-project\n\n\
                  Write the manifest somewhere else:\n    pyreqs scan --output deps/requirements.txt\n\n\
                  Use a custom import-to-package mapping:\n    pyreqs scan --mapping my_mapping.json")]
pub struct ScanArgs {
    /// Output manifest file, relative to the scan root unless absolute
    #[arg(long, short = 'o', default_value = "requirements.txt")]
    pub output: PathBuf,

    /// Package mapping file (defaults to package_mapping.json in the scan root)
    #[arg(long)]
    pub mapping: Option<PathBuf>,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Scan and install into a discovered or new .venv:\n    pyreqs install\n\n\
                  Skip the confirmation prompt:\n    pyreqs install -y\n\n\
                  Use a specific virtual environment directory:\n    pyreqs install --venv ./env")]
pub struct InstallArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Virtual environment directory (defaults to .venv, venv or myenv if present)
    #[arg(long)]
    pub venv: Option<PathBuf>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    pyreqs completions --shell bash > ~/.bash_completion.d/pyreqs\n\n\
                  Generate zsh completions:\n    pyreqs completions --shell zsh > ~/.zfunc/_pyreqs\n\n\
                  Generate fish completions:\n    pyreqs completions --shell fish > ~/.config/fish/completions/pyreqs.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
