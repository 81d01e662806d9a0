use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the run inputs
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no filename specified")]
    NoFilename,

    #[error("failed reading file {}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unmarshaling file {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("invalid package spec at [{index}], missing name")]
    MissingName { index: usize },

    #[error("invalid package spec at [{index}], missing version")]
    MissingVersion { index: usize },

    #[error("invalid package '{entry}', usage: --packages=<package@version>,...")]
    InvalidPackage { entry: String },

    #[error("invalid replace '{entry}', usage: --replaces=<oldpackage=newpackage@version>,...")]
    InvalidReplace { entry: String },

    #[error(transparent)]
    Core(#[from] modbump_core::Error),
}
