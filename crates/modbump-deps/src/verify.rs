//! Post-update checks

use crate::gomod::ManifestSnapshot;
use crate::version;
use crate::{Error, Result};
use modbump_core::DesiredSet;
use std::cmp::Ordering;
use tracing::debug;

/// Check that every requested package resolved to at least the requested
/// version.
///
/// Pinned revisions (anything that is not a semantic version) are only
/// checked for presence, since the toolchain rewrites them into
/// pseudo-versions.
///
/// # Errors
/// - [`Error::PackageMissing`] when a package is absent from the manifest
/// - [`Error::VersionTooLow`] when it resolved below the requested version
pub fn verify(desired: &DesiredSet, manifest: &ManifestSnapshot) -> Result<()> {
    for change in desired {
        let got = manifest
            .effective_version(&change.name)
            .ok_or_else(|| Error::PackageMissing(change.name.clone()))?;

        if !version::is_valid(&change.version) {
            debug!(package = %change.name, version = %got, "pinned revision present");
            continue;
        }

        if version::compare(got, &change.version) == Ordering::Less {
            return Err(Error::VersionTooLow {
                name: change.name.clone(),
                got: got.to_string(),
                want: change.version.clone(),
            });
        }
    }

    Ok(())
}
