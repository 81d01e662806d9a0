//! Reconciliation of the requested changes against the current manifest.
//!
//! Reconciliation decides, for every desired change, whether it goes through
//! a replace directive or a plain require, and whether anything needs to
//! happen at all. It is a pure function of its inputs: the desired set is
//! never modified, and the decisions come back as a separate value.

use crate::gomod::ManifestSnapshot;
use crate::types::{Action, Conflict, Decision, Reconciliation};
use crate::version;
use crate::{Error, Result};
use modbump_core::{DesiredChange, DesiredSet};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info, warn};

struct Working<'a> {
    change: &'a DesiredChange,
    sequence_index: usize,
    replace: bool,
    old_name: Option<String>,
    existing_replace: Option<(&'a str, Option<&'a str>)>,
    existing_require: Option<&'a str>,
    conflict: Option<&'a str>,
}

impl<'a> Working<'a> {
    fn new(sequence_index: usize, change: &'a DesiredChange) -> Self {
        Self {
            change,
            sequence_index,
            replace: change.replace,
            old_name: change.old_name().map(str::to_string),
            existing_replace: None,
            existing_require: None,
            conflict: None,
        }
    }

    /// Record `current` as a conflict when it is newer than the request,
    /// keeping the highest conflicting version.
    fn check_downgrade(&mut self, current: &'a str) {
        let requested = self.change.version.as_str();
        if !version::is_valid(requested) || !version::is_valid(current) {
            return;
        }
        if version::compare(current, requested) != Ordering::Greater {
            return;
        }
        match self.conflict {
            Some(seen) if version::compare(seen, current) != Ordering::Less => {}
            _ => self.conflict = Some(current),
        }
    }

    fn into_decision(self) -> Result<Decision> {
        let name = self.change.name.clone();
        let version = self.change.version.clone();

        if self.replace {
            let Some(old_path) = self.old_name else {
                return Err(Error::InvalidChange {
                    name,
                    reason: "replace requested without the module path to replace".to_string(),
                });
            };

            let current_version = self.existing_replace.and_then(|(_, v)| v).map(str::to_string);
            let unchanged = self
                .existing_replace
                .is_some_and(|(old, v)| old == old_path && v == Some(version.as_str()));

            let action = if unchanged {
                info!(package = %name, version = %version, "already at version");
                Action::Unchanged
            } else {
                Action::Replace { old_path }
            };

            return Ok(Decision {
                name,
                version,
                sequence_index: self.sequence_index,
                current_version,
                action,
            });
        }

        let current_version = self.existing_require.map(str::to_string);
        let action = match self.existing_require {
            Some(current) if current == version => {
                info!(package = %name, version = %version, "already at version");
                Action::Unchanged
            }
            Some(_) => Action::Require {
                drop_existing: true,
            },
            None => Action::Require {
                drop_existing: false,
            },
        };

        Ok(Decision {
            name,
            version,
            sequence_index: self.sequence_index,
            current_version,
            action,
        })
    }
}

/// Decide how each desired change is carried out against `manifest`.
///
/// # Errors
/// - [`Error::SelfBump`] when a desired package is the main module
/// - [`Error::DowngradeConflicts`] listing every package whose requested
///   version is lower than the manifest's
/// - [`Error::InvalidChange`] for a replacement with no old module path
pub fn reconcile(desired: &DesiredSet, manifest: &ManifestSnapshot) -> Result<Reconciliation> {
    let module = manifest.module_path();
    if let Some(change) = desired.iter().find(|c| c.name == module) {
        return Err(Error::SelfBump(change.name.clone()));
    }

    let mut working: Vec<Working<'_>> = desired
        .indexed()
        .map(|(index, change)| Working::new(index, change))
        .collect();
    let by_name: HashMap<&str, usize> = desired
        .iter()
        .enumerate()
        .map(|(i, change)| (change.name.as_str(), i))
        .collect();

    for w in &working {
        if !version::is_valid(&w.change.version) {
            warn!(
                package = %w.change.name,
                version = %w.change.version,
                "not a semantic version, treating as a pinned revision"
            );
        }
    }

    for replace in manifest.replaces() {
        let Some(&i) = by_name.get(replace.new.path.as_str()) else {
            continue;
        };
        let w = &mut working[i];
        w.replace = true;
        if w.old_name.is_none() {
            debug!(package = %w.change.name, old = %replace.old.path, "using existing replace directive");
            w.old_name = Some(replace.old.path.clone());
        }
        if w.existing_replace.is_none() {
            w.existing_replace = Some((replace.old.path.as_str(), replace.new.version.as_deref()));
        }
        if let Some(current) = replace.new.version.as_deref() {
            w.check_downgrade(current);
        }
    }

    for require in manifest.requires() {
        let Some(&i) = by_name.get(require.path.as_str()) else {
            continue;
        };
        let w = &mut working[i];
        if w.replace {
            continue;
        }
        if w.existing_require.is_none() {
            w.existing_require = Some(require.version.as_str());
        }
        w.check_downgrade(&require.version);
    }

    let conflicts: Vec<Conflict> = working
        .iter()
        .filter_map(|w| {
            w.conflict.map(|current| Conflict {
                name: w.change.name.clone(),
                requested: w.change.version.clone(),
                current: current.to_string(),
            })
        })
        .collect();
    if !conflicts.is_empty() {
        return Err(Error::DowngradeConflicts(conflicts));
    }

    let decisions = working
        .into_iter()
        .map(Working::into_decision)
        .collect::<Result<Vec<_>>>()?;

    Ok(Reconciliation::new(decisions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(content: &str) -> ManifestSnapshot {
        ManifestSnapshot::parse(content).unwrap()
    }

    const GO_MOD: &str = r#"module github.com/puerco/hello

go 1.21

require (
	github.com/google/uuid v1.3.1
	k8s.io/api v0.28.0
	k8s.io/client-go v0.27.0
)

replace github.com/google/gofuzz => github.com/fakefuzz v1.2.0
"#;

    #[test]
    fn test_self_bump_rejected() {
        let desired =
            DesiredSet::from_changes([DesiredChange::require("github.com/puerco/hello", "v1.0.0")])
                .unwrap();
        let err = reconcile(&desired, &manifest(GO_MOD)).unwrap_err();
        assert!(matches!(err, Error::SelfBump(ref name) if name == "github.com/puerco/hello"));
        assert_eq!(
            err.to_string(),
            "bumping the main module is not allowed 'github.com/puerco/hello'"
        );
    }

    #[test]
    fn test_plain_bump() {
        let desired =
            DesiredSet::from_changes([DesiredChange::require("github.com/google/uuid", "v1.4.0")])
                .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();
        let decision = result.get("github.com/google/uuid").unwrap();

        assert_eq!(decision.action, Action::Require { drop_existing: true });
        assert_eq!(decision.current_version.as_deref(), Some("v1.3.1"));
    }

    #[test]
    fn test_new_package_is_fetched() {
        let desired =
            DesiredSet::from_changes([DesiredChange::require("golang.org/x/mod", "v0.14.0")])
                .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();

        assert_eq!(
            result.get("golang.org/x/mod").unwrap().action,
            Action::Require { drop_existing: false }
        );
    }

    #[test]
    fn test_old_name_backfilled_from_replace_directive() {
        let desired =
            DesiredSet::from_changes([DesiredChange::require("github.com/fakefuzz", "v1.2.3")])
                .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();

        assert_eq!(
            result.get("github.com/fakefuzz").unwrap().action,
            Action::Replace {
                old_path: "github.com/google/gofuzz".to_string()
            }
        );
        // The caller's set is untouched.
        assert!(!desired.get("github.com/fakefuzz").unwrap().replace);
    }

    #[test]
    fn test_replace_directive_matched_on_new_path() {
        // Naming the old path of a replace directive is a plain require.
        let desired = DesiredSet::from_changes([DesiredChange::require(
            "github.com/google/gofuzz",
            "v1.2.3",
        )])
        .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();

        assert_eq!(
            result.get("github.com/google/gofuzz").unwrap().action,
            Action::Require { drop_existing: false }
        );
    }

    #[test]
    fn test_downgrades_reported_together_without_edits() {
        let desired = DesiredSet::from_changes([
            DesiredChange::require("k8s.io/api", "v0.27.0"),
            DesiredChange::require("github.com/google/uuid", "v1.4.0"),
            DesiredChange::require("github.com/fakefuzz", "v1.1.0"),
        ])
        .unwrap();

        let err = reconcile(&desired, &manifest(GO_MOD)).unwrap_err();
        let Error::DowngradeConflicts(conflicts) = err else {
            panic!("expected downgrade conflicts");
        };
        assert_eq!(
            conflicts,
            vec![
                Conflict {
                    name: "k8s.io/api".to_string(),
                    requested: "v0.27.0".to_string(),
                    current: "v0.28.0".to_string(),
                },
                Conflict {
                    name: "github.com/fakefuzz".to_string(),
                    requested: "v1.1.0".to_string(),
                    current: "v1.2.0".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_highest_conflicting_version_reported() {
        let content = "module example.com/app\n\nrequire (\n\texample.com/a v1.2.0\n\texample.com/a v1.5.0\n\texample.com/a v1.3.0\n)\n";
        let desired =
            DesiredSet::from_changes([DesiredChange::require("example.com/a", "v1.0.0")]).unwrap();

        let Err(Error::DowngradeConflicts(conflicts)) = reconcile(&desired, &manifest(content))
        else {
            panic!("expected downgrade conflicts");
        };
        assert_eq!(conflicts[0].current, "v1.5.0");
    }

    #[test]
    fn test_pinned_revision_skips_downgrade_check() {
        let desired =
            DesiredSet::from_changes([DesiredChange::require("k8s.io/api", "a1b2c3d4e5f6")])
                .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();

        assert_eq!(
            result.get("k8s.io/api").unwrap().action,
            Action::Require { drop_existing: true }
        );
    }

    #[test]
    fn test_already_at_version_is_unchanged() {
        let desired = DesiredSet::from_changes([
            DesiredChange::require("k8s.io/api", "v0.28.0"),
            DesiredChange::require("github.com/fakefuzz", "v1.2.0"),
        ])
        .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();

        assert_eq!(result.get("k8s.io/api").unwrap().action, Action::Unchanged);
        assert_eq!(result.get("github.com/fakefuzz").unwrap().action, Action::Unchanged);
    }

    #[test]
    fn test_replace_with_different_old_path_is_not_unchanged() {
        let desired = DesiredSet::from_changes([DesiredChange::replace(
            "github.com/other/fuzz",
            "github.com/fakefuzz",
            "v1.2.0",
        )])
        .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();

        assert_eq!(
            result.get("github.com/fakefuzz").unwrap().action,
            Action::Replace {
                old_path: "github.com/other/fuzz".to_string()
            }
        );
    }

    #[test]
    fn test_replace_without_old_name_rejected() {
        let mut change = DesiredChange::require("example.com/new", "v1.0.0");
        change.replace = true;
        let desired = DesiredSet::from_changes([change]).unwrap();

        let err = reconcile(&desired, &manifest(GO_MOD)).unwrap_err();
        assert!(matches!(err, Error::InvalidChange { ref name, .. } if name == "example.com/new"));
    }

    #[test]
    fn test_decisions_keep_desired_order_and_indices() {
        let desired = DesiredSet::from_changes([
            DesiredChange::require("k8s.io/client-go", "v0.28.0").with_index(2),
            DesiredChange::require("k8s.io/api", "v0.28.1").with_index(0),
        ])
        .unwrap();
        let result = reconcile(&desired, &manifest(GO_MOD)).unwrap();

        let names: Vec<(&str, usize)> = result
            .decisions()
            .iter()
            .map(|d| (d.name.as_str(), d.sequence_index))
            .collect();
        assert_eq!(names, vec![("k8s.io/client-go", 2), ("k8s.io/api", 0)]);
    }
}
