use crate::display;
use anyhow::{bail, Context, Result};
use clap::Args;
use modbump_config::{
    merge_replaces, parse_bump_file, parse_packages, parse_replaces, RunConfig,
};
use modbump_core::DesiredSet;
use modbump_deps::run_update;
use modbump_exec::GoToolchain;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct BumpArgs {
    /// Packages to update, as a space- or comma-separated list of
    /// `package@version`
    #[arg(long, conflicts_with = "bump_file")]
    pub packages: Option<String>,

    /// File listing the packages to update (YAML, or JSON with a .json
    /// extension)
    #[arg(long, value_name = "FILE")]
    pub bump_file: Option<PathBuf>,

    /// Packages to replace, as a space- or comma-separated list of
    /// `oldpackage=newpackage@version`
    #[arg(long)]
    pub replaces: Option<String>,

    /// Path to the go.mod root
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub modroot: PathBuf,

    /// Go version for 'go mod tidy' (detected from the local toolchain when
    /// unset)
    #[arg(long, value_name = "VERSION")]
    pub go_version: Option<String>,

    /// Run 'go mod tidy' before and after the update
    #[arg(long)]
    pub tidy: bool,

    /// Skip the 'go mod tidy' run before the update
    #[arg(long)]
    pub tidy_skip_initial: bool,

    /// Compatibility version passed to 'go mod tidy -compat'
    #[arg(long, value_name = "VERSION")]
    pub compat: Option<String>,

    /// Print the go.mod diff
    #[arg(long)]
    pub show_diff: bool,

    /// Use workspace mode even when no go.work governs the module root
    #[arg(long)]
    pub work: bool,

    /// Deadline for each go command, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl BumpArgs {
    /// Build the requested change set from the bump file or package list,
    /// then merge the replacements over it.
    pub fn desired_set(&self) -> Result<DesiredSet> {
        if self.packages.is_none() && self.bump_file.is_none() && self.replaces.is_none() {
            bail!("at least one of --packages, --bump-file or --replaces is required");
        }

        let mut set = match (&self.bump_file, &self.packages) {
            (Some(path), _) => parse_bump_file(path)
                .with_context(|| format!("Failed to read bump file {}", path.display()))?,
            (None, Some(list)) => DesiredSet::from_changes(
                parse_packages(list).context("Failed to parse --packages")?,
            )?,
            (None, None) => DesiredSet::new(),
        };

        if let Some(list) = &self.replaces {
            let replaces = parse_replaces(list).context("Failed to parse --replaces")?;
            merge_replaces(&mut set, replaces)?;
        }

        if set.is_empty() {
            bail!("no packages to update");
        }
        Ok(set)
    }

    /// Run configuration for this invocation
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            modroot: self.modroot.clone(),
            go_version: self.go_version.clone(),
            tidy: self.tidy,
            tidy_skip_initial: self.tidy_skip_initial,
            tidy_compat: self.compat.clone(),
            show_diff: self.show_diff,
            force_work: self.work,
            command_timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

pub fn handle_bump(args: BumpArgs) -> Result<()> {
    let desired = args.desired_set()?;
    let config = args.run_config();
    debug!(
        packages = desired.len(),
        modroot = %config.modroot.display(),
        tidy = config.tidy,
        "loaded requested changes"
    );

    let toolchain = match config.command_timeout {
        Some(timeout) => GoToolchain::new().with_timeout(timeout),
        None => GoToolchain::new(),
    };

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let outcome = runtime
        .block_on(run_update(&desired, &config, &toolchain))
        .with_context(|| format!("failed running update of {}", config.manifest_path().display()))?;

    info!(changed = outcome.plan.change_count(), "go.mod updated");

    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut writer = stdout.lock();
    display::print_outcome(&mut writer, &outcome, color)?;
    Ok(())
}
