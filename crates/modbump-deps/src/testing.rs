//! In-memory toolchain for tests.
//!
//! `FakeToolchain` records every call and, when the target directory holds a
//! go.mod, rewrites it the way the go command would for the edits modbump
//! issues. Pinned revisions are resolved to pseudo-versions.

use crate::gomod::{ManifestSnapshot, ModuleVersion, Replace, Require};
use crate::version;
use async_trait::async_trait;
use modbump_exec::{ExecError, ExecResult, Toolchain};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    EditReplace {
        old: String,
        new: String,
        version: String,
    },
    DropRequire(String),
    FetchAndAdd(String, String),
    Normalize {
        go_version: String,
        compat: Option<String>,
    },
    VendorSync {
        workspace: bool,
    },
    UpdateWorkspaceVersion {
        dir: PathBuf,
        version: String,
    },
    DetectVersion,
}

#[derive(Default)]
pub struct FakeToolchain {
    calls: Mutex<Vec<Call>>,
    failing_fetches: HashSet<String>,
    unused: HashSet<String>,
    resolutions: HashMap<String, String>,
    fail_normalize: bool,
    fail_vendor: bool,
    fail_detect: bool,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_fetch(mut self, path: &str) -> Self {
        self.failing_fetches.insert(path.to_string());
        self
    }

    /// Treat `path` as unused, so tidy removes its requirement
    pub fn unused(mut self, path: &str) -> Self {
        self.unused.insert(path.to_string());
        self
    }

    /// Make `go get` record `version` for `path` whatever was asked for
    pub fn resolve(mut self, path: &str, version: &str) -> Self {
        self.resolutions.insert(path.to_string(), version.to_string());
        self
    }

    pub fn fail_normalize(mut self) -> Self {
        self.fail_normalize = true;
        self
    }

    pub fn fail_vendor(mut self) -> Self {
        self.fail_vendor = true;
        self
    }

    pub fn fail_detect(mut self) -> Self {
        self.fail_detect = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that write go.mod, go.work or `vendor/`
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::DetectVersion))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(command: String) -> ExecError {
        ExecError::Failed {
            command,
            code: Some(1),
            output: "go: simulated failure".to_string(),
        }
    }
}

/// Resolve what `go get` would record for `version`.
pub fn resolved_version(version: &str) -> String {
    if version::is_valid(version) {
        return version.to_string();
    }
    let rev: String = version.chars().chain("000000000000".chars()).take(12).collect();
    format!("v0.0.0-20240101000000-{}", rev)
}

fn edit_manifest(dir: &Path, edit: impl FnOnce(&mut ManifestSnapshot)) {
    let path = dir.join("go.mod");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };
    let mut manifest = ManifestSnapshot::parse(&content).unwrap();
    edit(&mut manifest);
    std::fs::write(&path, render(&manifest)).unwrap();
}

/// Minimal go.mod rendering in the layout the go command writes.
pub fn render(manifest: &ManifestSnapshot) -> String {
    let mut out = format!("module {}\n", manifest.module);
    if let Some(go) = &manifest.go {
        out.push_str(&format!("\ngo {}\n", go));
    }
    if let Some(toolchain) = &manifest.toolchain {
        out.push_str(&format!("\ntoolchain {}\n", toolchain));
    }

    if !manifest.requires.is_empty() {
        out.push_str("\nrequire (\n");
        for require in &manifest.requires {
            out.push_str(&format!("\t{} {}", require.path, require.version));
            if require.indirect {
                out.push_str(" // indirect");
            }
            out.push('\n');
        }
        out.push_str(")\n");
    }

    if !manifest.replaces.is_empty() {
        out.push('\n');
        for replace in &manifest.replaces {
            let side = |m: &ModuleVersion| match &m.version {
                Some(v) => format!("{} {}", m.path, v),
                None => m.path.clone(),
            };
            out.push_str(&format!("replace {} => {}\n", side(&replace.old), side(&replace.new)));
        }
    }
    out
}

#[async_trait]
impl Toolchain for FakeToolchain {
    async fn edit_replace(
        &self,
        old_path: &str,
        new_path: &str,
        version: &str,
        dir: &Path,
    ) -> ExecResult<String> {
        self.record(Call::EditReplace {
            old: old_path.to_string(),
            new: new_path.to_string(),
            version: version.to_string(),
        });
        edit_manifest(dir, |m| {
            m.replaces.retain(|r| r.old.path != old_path);
            m.replaces.push(Replace {
                old: ModuleVersion {
                    path: old_path.to_string(),
                    version: None,
                },
                new: ModuleVersion {
                    path: new_path.to_string(),
                    version: Some(resolved_version(version)),
                },
            });
        });
        Ok(String::new())
    }

    async fn drop_require(&self, path: &str, dir: &Path) -> ExecResult<String> {
        self.record(Call::DropRequire(path.to_string()));
        edit_manifest(dir, |m| m.requires.retain(|r| r.path != path));
        Ok(String::new())
    }

    async fn fetch_and_add(&self, path: &str, version: &str, dir: &Path) -> ExecResult<String> {
        self.record(Call::FetchAndAdd(path.to_string(), version.to_string()));
        if self.failing_fetches.contains(path) {
            return Err(Self::failure(format!("go get {}@{}", path, version)));
        }
        let resolved = self
            .resolutions
            .get(path)
            .cloned()
            .unwrap_or_else(|| resolved_version(version));
        edit_manifest(dir, |m| {
            m.requires.retain(|r| r.path != path);
            m.requires.push(Require {
                path: path.to_string(),
                version: resolved,
                indirect: false,
            });
        });
        Ok(format!("go: upgraded {} => {}", path, version))
    }

    async fn normalize(
        &self,
        dir: &Path,
        toolchain_version: &str,
        compat: Option<&str>,
    ) -> ExecResult<String> {
        self.record(Call::Normalize {
            go_version: toolchain_version.to_string(),
            compat: compat.map(str::to_string),
        });
        if self.fail_normalize {
            return Err(Self::failure("go mod tidy".to_string()));
        }
        edit_manifest(dir, |m| {
            m.go = Some(toolchain_version.to_string());
            m.requires.retain(|r| !self.unused.contains(&r.path));
        });
        Ok(String::new())
    }

    async fn vendor_sync(&self, _dir: &Path, workspace_mode: bool) -> ExecResult<String> {
        self.record(Call::VendorSync {
            workspace: workspace_mode,
        });
        if self.fail_vendor {
            return Err(Self::failure("go mod vendor".to_string()));
        }
        Ok(String::new())
    }

    async fn update_workspace_version(
        &self,
        work_dir: &Path,
        toolchain_version: &str,
    ) -> ExecResult<String> {
        self.record(Call::UpdateWorkspaceVersion {
            dir: work_dir.to_path_buf(),
            version: toolchain_version.to_string(),
        });
        Ok(String::new())
    }

    async fn detect_version(&self) -> ExecResult<String> {
        self.record(Call::DetectVersion);
        if self.fail_detect {
            return Err(ExecError::UnexpectedOutput {
                command: "go version".to_string(),
                output: "command not found".to_string(),
            });
        }
        Ok("1.22.0".to_string())
    }
}
