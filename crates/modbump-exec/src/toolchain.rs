//! Toolchain trait for manifest edits and dependency fetches.

use crate::ExecResult;
use std::path::Path;

/// The external toolchain that owns go.mod mutation.
///
/// Each method corresponds to one blocking toolchain request and returns the
/// command's combined output on success. Implementations must not run calls
/// concurrently against the same module directory; the update engine awaits
/// each call before issuing the next.
///
/// # Error Handling
///
/// A failed call carries the command line and its diagnostic output in
/// [`ExecError`](crate::ExecError). Callers treat every failure as terminal;
/// nothing is retried.
#[async_trait::async_trait]
pub trait Toolchain: Send + Sync {
    /// Replace `old_path` with `new_path@version`, dropping any earlier
    /// replacement of `old_path` first.
    async fn edit_replace(
        &self,
        old_path: &str,
        new_path: &str,
        version: &str,
        dir: &Path,
    ) -> ExecResult<String>;

    /// Drop the require directive for `path`.
    async fn drop_require(&self, path: &str, dir: &Path) -> ExecResult<String>;

    /// Fetch `path@version` and record it as a requirement.
    async fn fetch_and_add(&self, path: &str, version: &str, dir: &Path) -> ExecResult<String>;

    /// Normalize the manifest (tidy) for the given language version, with an
    /// optional compatibility pin.
    async fn normalize(
        &self,
        dir: &Path,
        toolchain_version: &str,
        compat: Option<&str>,
    ) -> ExecResult<String>;

    /// Sync the vendor directory, per-module or for the whole workspace.
    async fn vendor_sync(&self, dir: &Path, workspace_mode: bool) -> ExecResult<String>;

    /// Set the language version recorded in the workspace file found in
    /// `work_dir`.
    async fn update_workspace_version(
        &self,
        work_dir: &Path,
        toolchain_version: &str,
    ) -> ExecResult<String>;

    /// Report the locally installed toolchain version (e.g. `1.21.5`).
    async fn detect_version(&self) -> ExecResult<String>;
}
