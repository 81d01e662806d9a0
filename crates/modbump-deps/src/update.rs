//! End-to-end update of one module

use crate::apply::apply;
use crate::diff::manifest_diff;
use crate::gomod::{GoWorkspace, ManifestSnapshot};
use crate::order::into_plan;
use crate::reconcile::reconcile;
use crate::types::UpdateOutcome;
use crate::verify::verify;
use crate::{Error, Result};
use modbump_config::RunConfig;
use modbump_core::DesiredSet;
use modbump_exec::Toolchain;
use std::path::Path;
use tracing::{debug, info};

/// Bring the module at `config.modroot` up to the versions in `desired`.
///
/// Steps, each awaited before the next:
/// 1. Load go.mod and validate the request against it
/// 2. Resolve the go version (configured, or detected from the toolchain)
/// 3. Sync the go.work version when a workspace governs the module
/// 4. Tidy, unless disabled or skipped for the initial pass
/// 5. Reconcile against the tidied go.mod and order the plan
/// 6. Apply the plan
/// 7. Tidy again when enabled
/// 8. Reload go.mod and verify the requested versions
/// 9. Diff when requested
/// 10. Sync `vendor/` when the module has one
///
/// A self-bump or downgrade is rejected in step 1, before any go command
/// runs.
///
/// # Errors
/// Stops at the first failing step. Toolchain edits already made are not
/// undone.
pub async fn run_update(
    desired: &DesiredSet,
    config: &RunConfig,
    toolchain: &dyn Toolchain,
) -> Result<UpdateOutcome> {
    let gowork = std::env::var("GOWORK").ok();
    run_update_with(desired, config, toolchain, gowork.as_deref()).await
}

pub(crate) async fn run_update_with(
    desired: &DesiredSet,
    config: &RunConfig,
    toolchain: &dyn Toolchain,
    gowork: Option<&str>,
) -> Result<UpdateOutcome> {
    let manifest_path = config.manifest_path();
    let initial = ManifestSnapshot::load(&manifest_path).await?;
    let mut reconciliation = reconcile(desired, &initial)?;

    let go_version = match &config.go_version {
        Some(version) => version.clone(),
        None => {
            let version = toolchain
                .detect_version()
                .await
                .map_err(Error::ToolchainVersion)?;
            info!(version = %version, "detected go version");
            version
        }
    };

    let governing = GoWorkspace::locate_with(config.modroot(), gowork);
    let workspace = match &governing {
        Some(workspace) => Some(workspace.clone()),
        None if config.force_work => GoWorkspace::locate_with(Path::new("."), gowork),
        None => None,
    };
    if let Some(workspace) = &workspace {
        info!(path = %workspace.path().display(), version = %go_version, "updating go.work version");
        toolchain
            .update_workspace_version(workspace.dir(), &go_version)
            .await
            .map_err(Error::Workspace)?;
    } else if config.force_work {
        debug!("no go.work found, skipping workspace version update");
    }

    let before = if config.tidy_before() {
        tidy(config, toolchain, &go_version).await?;
        let tidied = ManifestSnapshot::load(&manifest_path).await?;
        reconciliation = reconcile(desired, &tidied)?;
        tidied
    } else {
        initial
    };

    let plan = into_plan(reconciliation.into_decisions());
    if plan.change_count() == 0 {
        info!("all packages already at the requested versions");
    }

    apply(&plan, config, toolchain).await?;

    if config.tidy {
        tidy(config, toolchain, &go_version).await?;
    }

    let after = ManifestSnapshot::load(&manifest_path).await?;
    verify(desired, &after)?;

    let diff = if config.show_diff {
        manifest_diff(before.content(), after.content())
    } else {
        None
    };

    if config.vendor_dir().is_dir() {
        let workspace_mode = config.force_work || governing.is_some();
        info!(workspace = workspace_mode, "syncing vendor directory");
        toolchain
            .vendor_sync(config.modroot(), workspace_mode)
            .await
            .map_err(Error::Vendor)?;
    }

    Ok(UpdateOutcome {
        manifest: after,
        plan,
        diff,
    })
}

async fn tidy(config: &RunConfig, toolchain: &dyn Toolchain, go_version: &str) -> Result<()> {
    info!(go = %go_version, "running go mod tidy");
    let output = toolchain
        .normalize(config.modroot(), go_version, config.tidy_compat.as_deref())
        .await
        .map_err(Error::Normalize)?;
    debug!(output = %output, "go mod tidy");
    Ok(())
}
