//! go.mod reading and querying, plus go.work discovery

pub mod parser;
pub mod workspace;

pub use parser::ParseError;
pub use workspace::GoWorkspace;

use crate::{Error, Result};
use std::path::Path;

/// A module path with an optional version, as written on either side of a
/// replace directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersion {
    /// Module path (or filesystem path for local replacements)
    pub path: String,
    /// Version, absent for whole-module or filesystem replacements
    pub version: Option<String>,
}

/// A `require` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    /// Module path
    pub path: String,
    /// Required version
    pub version: String,
    /// Marked `// indirect`
    pub indirect: bool,
}

/// A `replace` directive: `old [version] => new [version]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    /// The module being replaced
    pub old: ModuleVersion,
    /// The replacement
    pub new: ModuleVersion,
}

/// An immutable parse of a go.mod file at one point in time.
///
/// Snapshots are never patched: after the toolchain rewrites the file on
/// disk, a fresh snapshot is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSnapshot {
    pub(crate) module: String,
    pub(crate) go: Option<String>,
    pub(crate) toolchain: Option<String>,
    pub(crate) requires: Vec<Require>,
    pub(crate) replaces: Vec<Replace>,
    pub(crate) content: String,
}

impl ManifestSnapshot {
    /// Parse go.mod content
    pub fn parse(content: &str) -> std::result::Result<Self, ParseError> {
        parser::parse(content)
    }

    /// Read and parse the go.mod file at `path`
    ///
    /// # Errors
    /// Returns [`Error::ManifestRead`] if the file cannot be read and
    /// [`Error::ManifestParse`] if it is malformed
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::ManifestRead {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&content).map_err(|source| Error::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The module's own path
    pub fn module_path(&self) -> &str {
        &self.module
    }

    /// The `go` directive, if present
    pub fn go_version(&self) -> Option<&str> {
        self.go.as_deref()
    }

    /// The `toolchain` directive, if present
    pub fn toolchain(&self) -> Option<&str> {
        self.toolchain.as_deref()
    }

    /// Require directives in file order
    pub fn requires(&self) -> &[Require] {
        &self.requires
    }

    /// Replace directives in file order
    pub fn replaces(&self) -> &[Replace] {
        &self.replaces
    }

    /// The raw file content this snapshot was parsed from
    pub fn content(&self) -> &str {
        &self.content
    }

    /// First require directive for `path`
    pub fn find_require(&self, path: &str) -> Option<&Require> {
        self.requires.iter().find(|r| r.path == path)
    }

    /// First replace directive whose new path is `path`
    pub fn replacement_for(&self, path: &str) -> Option<&Replace> {
        self.replaces.iter().find(|r| r.new.path == path)
    }

    /// The version `path` effectively resolves to.
    ///
    /// Replace directives are consulted first, matched on their new path; a
    /// replacement without a version (a local directory) counts as not
    /// present. Require directives are consulted next. `None` means the
    /// package is not in the manifest.
    pub fn effective_version(&self, path: &str) -> Option<&str> {
        if let Some(replace) = self.replacement_for(path) {
            return replace.new.version.as_deref();
        }
        self.find_require(path).map(|r| r.version.as_str())
    }
}
