//! Native toolchain implementation that shells out to the `go` command.

use crate::{ExecError, ExecResult, Toolchain};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs the real `go` binary.
///
/// Every call is a child process awaited to completion. When a timeout is
/// configured, a call that exceeds it is killed and reported as
/// [`ExecError::TimedOut`].
#[derive(Debug, Clone)]
pub struct GoToolchain {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl GoToolchain {
    /// Use `go` from `PATH`, with no deadline.
    pub fn new() -> Self {
        Self::with_binary("go")
    }

    /// Use a specific binary in place of `go`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Apply a deadline to every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured per-call deadline, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.binary.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    async fn run(&self, dir: Option<&Path>, args: &[&str]) -> ExecResult<String> {
        let command_line = self.command_line(args);
        debug!(command = %command_line, dir = ?dir, "running toolchain command");

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let result = match self.timeout {
            Some(after) => match tokio::time::timeout(after, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ExecError::TimedOut {
                        command: command_line,
                        after,
                    })
                }
            },
            None => cmd.output().await,
        };

        let output = result.map_err(|source| ExecError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        if !output.status.success() {
            return Err(ExecError::Failed {
                command: command_line,
                code: output.status.code(),
                output: combined,
            });
        }

        Ok(combined)
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Toolchain for GoToolchain {
    async fn edit_replace(
        &self,
        old_path: &str,
        new_path: &str,
        version: &str,
        dir: &Path,
    ) -> ExecResult<String> {
        self.run(Some(dir), &["mod", "edit", "-dropreplace", old_path])
            .await?;

        let replacement = format!("{}={}@{}", old_path, new_path, version);
        self.run(Some(dir), &["mod", "edit", "-replace", &replacement])
            .await
    }

    async fn drop_require(&self, path: &str, dir: &Path) -> ExecResult<String> {
        self.run(Some(dir), &["mod", "edit", "-droprequire", path])
            .await
    }

    async fn fetch_and_add(&self, path: &str, version: &str, dir: &Path) -> ExecResult<String> {
        let target = format!("{}@{}", path, version);
        self.run(Some(dir), &["get", &target]).await
    }

    async fn normalize(
        &self,
        dir: &Path,
        toolchain_version: &str,
        compat: Option<&str>,
    ) -> ExecResult<String> {
        let mut args = vec!["mod", "tidy", "-go", toolchain_version];
        if let Some(compat) = compat {
            args.extend(["-compat", compat]);
        }
        self.run(Some(dir), &args).await
    }

    async fn vendor_sync(&self, dir: &Path, workspace_mode: bool) -> ExecResult<String> {
        let args: &[&str] = if workspace_mode {
            &["work", "vendor"]
        } else {
            &["mod", "vendor"]
        };
        self.run(Some(dir), args).await
    }

    async fn update_workspace_version(
        &self,
        work_dir: &Path,
        toolchain_version: &str,
    ) -> ExecResult<String> {
        self.run(Some(work_dir), &["work", "edit", "-go", toolchain_version])
            .await
    }

    async fn detect_version(&self) -> ExecResult<String> {
        let output = self.run(None, &["version"]).await?;
        parse_go_version(&output).ok_or_else(|| ExecError::UnexpectedOutput {
            command: self.command_line(&["version"]),
            output,
        })
    }
}

/// Extract the version from `go version` output.
///
/// `go version go1.21.5 linux/amd64` yields `1.21.5`. Output whose third
/// field does not start with `go` yields `None`.
pub fn parse_go_version(output: &str) -> Option<String> {
    let version = output.split_whitespace().nth(2)?.strip_prefix("go")?;
    if version.is_empty() {
        return None;
    }
    Some(version.to_string())
}
