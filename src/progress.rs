//! Progress bar display for package installation

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for per-package installation
pub struct ProgressDisplay {
    package_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total package count
    pub fn new(total_packages: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let package_pb = ProgressBar::new(total_packages);
        package_pb.set_style(style);

        Self { package_pb }
    }

    /// Show the package currently being installed
    pub fn update_package(&self, package: &str) {
        self.package_pb.set_message(package.to_string());
    }

    /// Increment package progress
    pub fn inc(&self) {
        self.package_pb.inc(1);
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.package_pb.finish_and_clear();
    }
}
