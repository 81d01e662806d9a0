use std::path::{Path, PathBuf};
use std::time::Duration;

/// Manifest file name inside the module root
pub const MANIFEST_FILE: &str = "go.mod";

/// Vendor directory name inside the module root
pub const VENDOR_DIR: &str = "vendor";

/// Process-wide configuration for one update run.
///
/// Built once from flags and passed by reference; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory holding the go.mod to update
    pub modroot: PathBuf,

    /// Language version for normalization; detected from the local
    /// toolchain when unset
    pub go_version: Option<String>,

    /// Run `go mod tidy` before and after the edits
    pub tidy: bool,

    /// Skip the tidy pass that runs before the edits
    pub tidy_skip_initial: bool,

    /// Compatibility version passed to tidy as `-compat`
    pub tidy_compat: Option<String>,

    /// Produce a diff of go.mod before and after the run
    pub show_diff: bool,

    /// Treat the module as part of a workspace even when no go.work is
    /// found above the module root
    pub force_work: bool,

    /// Deadline for each toolchain call
    pub command_timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            modroot: PathBuf::from("."),
            go_version: None,
            tidy: false,
            tidy_skip_initial: false,
            tidy_compat: None,
            show_diff: false,
            force_work: false,
            command_timeout: None,
        }
    }
}

impl RunConfig {
    /// Configuration for the module at `modroot` with every option off
    pub fn new(modroot: impl Into<PathBuf>) -> Self {
        Self {
            modroot: modroot.into(),
            ..Self::default()
        }
    }

    /// Path of the go.mod file
    pub fn manifest_path(&self) -> PathBuf {
        self.modroot.join(MANIFEST_FILE)
    }

    /// Path of the vendor directory
    pub fn vendor_dir(&self) -> PathBuf {
        self.modroot.join(VENDOR_DIR)
    }

    /// Module root directory
    pub fn modroot(&self) -> &Path {
        &self.modroot
    }

    /// Whether a tidy pass should run before the edits
    pub fn tidy_before(&self) -> bool {
        self.tidy && !self.tidy_skip_initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let config = RunConfig::new("/src/app");
        assert_eq!(config.manifest_path(), PathBuf::from("/src/app/go.mod"));
        assert_eq!(config.vendor_dir(), PathBuf::from("/src/app/vendor"));
    }

    #[test]
    fn test_tidy_before() {
        let mut config = RunConfig::default();
        assert!(!config.tidy_before());

        config.tidy = true;
        assert!(config.tidy_before());

        config.tidy_skip_initial = true;
        assert!(!config.tidy_before());
    }
}
