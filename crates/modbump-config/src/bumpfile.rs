//! Bump-file decoding.
//!
//! A bump file lists the packages to update, in apply order:
//!
//! ```yaml
//! packages:
//!   - name: github.com/google/uuid
//!     version: v1.4.0
//!   - name: k8s.io/client-go
//!     oldName: k8s.io/client-go
//!     version: v0.28.0
//!     replace: true
//! ```
//!
//! The same shape is accepted as JSON. Each entry's position becomes its
//! apply-order index.

use crate::ConfigError;
use modbump_core::{DesiredChange, DesiredSet};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Encoding of a bump file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpFileFormat {
    Yaml,
    Json,
}

impl BumpFileFormat {
    /// Pick the format from the file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct BumpFile {
    #[serde(default)]
    packages: Vec<DesiredChange>,
}

/// Read and decode a bump file.
pub fn parse_bump_file(path: &Path) -> Result<DesiredSet, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::NoFilename);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let set = decode(&content, BumpFileFormat::from_path(path), path)?;
    debug!(path = %path.display(), packages = set.len(), "parsed bump file");
    Ok(set)
}

/// Decode bump-file content that did not come from disk.
pub fn parse_bump_str(content: &str, format: BumpFileFormat) -> Result<DesiredSet, ConfigError> {
    decode(content, format, Path::new("<inline>"))
}

fn decode(content: &str, format: BumpFileFormat, path: &Path) -> Result<DesiredSet, ConfigError> {
    let file: BumpFile = if content.trim().is_empty() {
        BumpFile::default()
    } else {
        let decoded: Result<BumpFile, String> = match format {
            BumpFileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            BumpFileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        decoded.map_err(|message| ConfigError::Decode {
            path: PathBuf::from(path),
            message,
        })?
    };

    let mut set = DesiredSet::new();
    for (index, mut change) in file.packages.into_iter().enumerate() {
        if change.name.trim().is_empty() {
            return Err(ConfigError::MissingName { index });
        }
        if change.version.trim().is_empty() {
            return Err(ConfigError::MissingVersion { index });
        }
        change.sequence_index = Some(index);
        set.insert(change)?;
    }
    Ok(set)
}
