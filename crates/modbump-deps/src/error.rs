//! Error types for modbump-deps

use crate::gomod::ParseError;
use crate::types::Conflict;
use modbump_exec::ExecError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using modbump-deps Error
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The manifest could not be read or is malformed
    Parse,
    /// The requested changes are not acceptable
    Validation,
    /// A toolchain edit, normalization, vendor or workspace step failed
    Apply,
    /// The manifest does not satisfy the request after the update
    PostCondition,
    /// The toolchain version could not be determined
    Toolchain,
}

/// Errors that can occur in modbump-deps
#[derive(Debug, Error)]
pub enum Error {
    /// go.mod could not be read
    #[error("failed to read {}", .path.display())]
    ManifestRead {
        /// Path of the go.mod file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// go.mod is malformed
    #[error("failed to parse {}", .path.display())]
    ManifestParse {
        /// Path of the go.mod file
        path: PathBuf,
        /// What was malformed, and where
        #[source]
        source: ParseError,
    },

    /// A requested package is the main module itself
    #[error("bumping the main module is not allowed '{0}'")]
    SelfBump(String),

    /// Requested versions lower than what the manifest already has
    #[error("{}", describe_conflicts(.0))]
    DowngradeConflicts(Vec<Conflict>),

    /// A change that cannot be applied as requested
    #[error("invalid change for package {name}: {reason}")]
    InvalidChange {
        /// Module path
        name: String,
        /// Why the change was rejected
        reason: String,
    },

    /// A toolchain edit failed while applying the plan
    #[error("failed to {operation} package {package}")]
    ApplyFailed {
        /// Module path being applied
        package: String,
        /// The edit that failed
        operation: &'static str,
        /// The failed toolchain call
        #[source]
        source: ExecError,
    },

    /// `go mod tidy` failed
    #[error("failed to run 'go mod tidy'")]
    Normalize(#[source] ExecError),

    /// Vendor directory sync failed
    #[error("failed to sync vendor directory")]
    Vendor(#[source] ExecError),

    /// go.work version sync failed
    #[error("failed to update go.work")]
    Workspace(#[source] ExecError),

    /// The toolchain version could not be detected
    #[error("failed to detect go version")]
    ToolchainVersion(#[source] ExecError),

    /// A requested package is absent after the update
    #[error("package {0} was not found on the go.mod file. Please remove the package or add it to the list of 'replaces'")]
    PackageMissing(String),

    /// A requested package resolved to a lower version than requested
    #[error("package {name}: requested {want}, got {got}")]
    VersionTooLow {
        /// Module path
        name: String,
        /// Version in the manifest
        got: String,
        /// Version requested
        want: String,
    },

    /// Invalid desired change
    #[error(transparent)]
    Core(#[from] modbump_core::Error),
}

impl Error {
    /// The category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestRead { .. } | Self::ManifestParse { .. } => ErrorKind::Parse,
            Self::SelfBump(_)
            | Self::DowngradeConflicts(_)
            | Self::InvalidChange { .. }
            | Self::Core(_) => ErrorKind::Validation,
            Self::ApplyFailed { .. }
            | Self::Normalize(_)
            | Self::Vendor(_)
            | Self::Workspace(_) => ErrorKind::Apply,
            Self::PackageMissing(_) | Self::VersionTooLow { .. } => ErrorKind::PostCondition,
            Self::ToolchainVersion(_) => ErrorKind::Toolchain,
        }
    }
}

fn describe_conflicts(conflicts: &[Conflict]) -> String {
    let lines: Vec<String> = conflicts
        .iter()
        .map(|c| {
            format!(
                "package {}: requested version '{}', is already at version '{}'",
                c.name, c.requested, c.current
            )
        })
        .collect();
    lines.join("\n")
}
