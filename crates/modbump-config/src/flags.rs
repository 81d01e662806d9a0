//! Parsing of the inline `--packages` and `--replaces` lists.

use crate::ConfigError;
use modbump_core::{DesiredChange, DesiredSet};
use tracing::debug;

fn entries(list: &str) -> impl Iterator<Item = &str> {
    list.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|entry| !entry.is_empty())
}

/// Parse a whitespace- or comma-separated list of `package@version`.
pub fn parse_packages(list: &str) -> Result<Vec<DesiredChange>, ConfigError> {
    entries(list)
        .map(|entry| match entry.split('@').collect::<Vec<_>>().as_slice() {
            [name, version] if !name.is_empty() && !version.is_empty() => {
                Ok(DesiredChange::require(*name, *version))
            }
            _ => Err(ConfigError::InvalidPackage {
                entry: entry.to_string(),
            }),
        })
        .collect()
}

/// Parse a whitespace- or comma-separated list of
/// `oldpackage=newpackage@version`.
pub fn parse_replaces(list: &str) -> Result<Vec<DesiredChange>, ConfigError> {
    entries(list)
        .map(|entry| {
            let invalid = || ConfigError::InvalidReplace {
                entry: entry.to_string(),
            };

            let (old, new) = match entry.split('=').collect::<Vec<_>>().as_slice() {
                [old, new] if !old.is_empty() => (*old, *new),
                _ => return Err(invalid()),
            };
            match new.split('@').collect::<Vec<_>>().as_slice() {
                [name, version] if !name.is_empty() && !version.is_empty() => {
                    Ok(DesiredChange::replace(old, *name, *version))
                }
                _ => Err(invalid()),
            }
        })
        .collect()
}

/// Merge replacements into a set, overwriting same-named entries.
pub fn merge_replaces(
    set: &mut DesiredSet,
    replaces: Vec<DesiredChange>,
) -> Result<(), ConfigError> {
    for replace in replaces {
        if let Some(previous) = set.insert(replace)? {
            debug!(package = %previous.name, "replace overrides requested bump");
        }
    }
    Ok(())
}
