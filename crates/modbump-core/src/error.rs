//! Error types for modbump core.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a desired-change set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A change was given without a module path.
    #[error("invalid package spec, missing name")]
    MissingName,

    /// A change was given without a version.
    #[error("invalid package spec for {name}, missing version")]
    MissingVersion {
        /// Module path of the offending change.
        name: String,
    },
}
