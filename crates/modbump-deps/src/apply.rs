//! Plan execution through the toolchain

use crate::types::{Action, Plan};
use crate::{Error, Result};
use modbump_config::RunConfig;
use modbump_exec::Toolchain;
use tracing::{debug, info};

/// Execute `plan` against the module at `config.modroot`.
///
/// Replacements run first, in plan order, followed by requirements. A
/// requirement that is already in the manifest has its directive dropped
/// before the new version is fetched.
///
/// # Errors
/// The first failed toolchain call stops the run with
/// [`Error::ApplyFailed`]. Edits already made are left in place.
pub async fn apply(plan: &Plan, config: &RunConfig, toolchain: &dyn Toolchain) -> Result<()> {
    let dir = config.modroot();

    for decision in plan.replaces() {
        let Action::Replace { old_path } = &decision.action else {
            continue;
        };
        info!(
            old = %old_path,
            package = %decision.name,
            version = %decision.version,
            "replacing package"
        );
        let output = toolchain
            .edit_replace(old_path, &decision.name, &decision.version, dir)
            .await
            .map_err(|source| Error::ApplyFailed {
                package: decision.name.clone(),
                operation: "replace",
                source,
            })?;
        debug!(output = %output, "go mod edit -replace");
    }

    for decision in plan.requires() {
        let Action::Require { drop_existing } = decision.action else {
            continue;
        };

        if drop_existing {
            debug!(package = %decision.name, "dropping existing requirement");
            toolchain
                .drop_require(&decision.name, dir)
                .await
                .map_err(|source| Error::ApplyFailed {
                    package: decision.name.clone(),
                    operation: "drop requirement for",
                    source,
                })?;
        }

        info!(package = %decision.name, version = %decision.version, "updating package");
        let output = toolchain
            .fetch_and_add(&decision.name, &decision.version, dir)
            .await
            .map_err(|source| Error::ApplyFailed {
                package: decision.name.clone(),
                operation: "get",
                source,
            })?;
        debug!(output = %output, "go get");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeToolchain};
    use crate::types::Decision;

    fn decision(name: &str, index: usize, action: Action) -> Decision {
        Decision {
            name: name.to_string(),
            version: "v1.0.0".to_string(),
            sequence_index: index,
            current_version: None,
            action,
        }
    }

    #[tokio::test]
    async fn test_replaces_run_before_requires() {
        let plan = Plan::new(vec![
            decision("example.com/a", 0, Action::Require { drop_existing: true }),
            decision(
                "example.com/b",
                1,
                Action::Replace {
                    old_path: "example.com/old".to_string(),
                },
            ),
            decision("example.com/c", 2, Action::Require { drop_existing: false }),
            decision("example.com/d", 3, Action::Unchanged),
        ]);
        let toolchain = FakeToolchain::new();
        let config = RunConfig::new("/work/mod");

        apply(&plan, &config, &toolchain).await.unwrap();

        assert_eq!(
            toolchain.calls(),
            vec![
                Call::EditReplace {
                    old: "example.com/old".to_string(),
                    new: "example.com/b".to_string(),
                    version: "v1.0.0".to_string(),
                },
                Call::DropRequire("example.com/a".to_string()),
                Call::FetchAndAdd("example.com/a".to_string(), "v1.0.0".to_string()),
                Call::FetchAndAdd("example.com/c".to_string(), "v1.0.0".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_failure_aborts() {
        let plan = Plan::new(vec![
            decision("example.com/a", 0, Action::Require { drop_existing: false }),
            decision("example.com/b", 1, Action::Require { drop_existing: false }),
        ]);
        let toolchain = FakeToolchain::new().fail_fetch("example.com/a");
        let config = RunConfig::new("/work/mod");

        let err = apply(&plan, &config, &toolchain).await.unwrap_err();

        assert!(matches!(
            err,
            Error::ApplyFailed { ref package, operation: "get", .. } if package == "example.com/a"
        ));
        assert_eq!(toolchain.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_plan_issues_no_calls() {
        let plan = Plan::new(vec![decision("example.com/a", 0, Action::Unchanged)]);
        let toolchain = FakeToolchain::new();

        apply(&plan, &RunConfig::default(), &toolchain).await.unwrap();
        assert!(toolchain.calls().is_empty());
    }
}
