//! go.work discovery

use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the workspace file
pub const WORKSPACE_FILE: &str = "go.work";

/// A go.work file governing a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoWorkspace {
    path: PathBuf,
}

impl GoWorkspace {
    /// Find the workspace governing `start`, honouring the `GOWORK`
    /// environment variable.
    pub fn locate(start: &Path) -> Option<Self> {
        let gowork = std::env::var("GOWORK").ok();
        Self::locate_with(start, gowork.as_deref())
    }

    /// Find the workspace governing `start` given an explicit `GOWORK` value.
    ///
    /// `off` disables workspaces. Unset, empty or `auto` walks up from
    /// `start` looking for a go.work file. Anything else is taken as the
    /// path of the workspace file, relative to `start` when not absolute.
    pub fn locate_with(start: &Path, gowork: Option<&str>) -> Option<Self> {
        match gowork.map(str::trim) {
            Some("off") => {
                debug!("workspace mode disabled by GOWORK=off");
                None
            }
            None | Some("") | Some("auto") => Self::walk_up(start),
            Some(explicit) => Some(Self {
                path: start.join(explicit),
            }),
        }
    }

    fn walk_up(start: &Path) -> Option<Self> {
        let mut current = Some(start);
        while let Some(dir) = current {
            let candidate = dir.join(WORKSPACE_FILE);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found go.work");
                return Some(Self { path: candidate });
            }
            current = dir.parent();
        }
        None
    }

    /// Path of the go.work file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the go.work file
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}
