//! Plan types shared by reconciliation, apply and orchestration

use crate::gomod::ManifestSnapshot;

/// What the apply engine does for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Rewrite the replace directive for `old_path` to point at the package
    Replace {
        /// Module path being replaced
        old_path: String,
    },
    /// Fetch the package at the requested version
    Require {
        /// The package is already required and its directive is dropped first
        drop_existing: bool,
    },
    /// Already at the requested version
    Unchanged,
}

/// Reconciliation's verdict for one desired change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Module path
    pub name: String,
    /// Requested version
    pub version: String,
    /// Effective apply-order index
    pub sequence_index: usize,
    /// Version currently in the manifest, if any
    pub current_version: Option<String>,
    /// What to do
    pub action: Action,
}

impl Decision {
    /// Whether applying this decision edits the manifest
    pub fn is_change(&self) -> bool {
        !matches!(self.action, Action::Unchanged)
    }

    /// Whether this decision goes through a replace directive
    pub fn is_replace(&self) -> bool {
        matches!(self.action, Action::Replace { .. })
    }
}

/// Decisions in apply order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    decisions: Vec<Decision>,
}

impl Plan {
    /// Build a plan from decisions already in apply order
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self { decisions }
    }

    /// Decisions in apply order
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Replace decisions in apply order
    pub fn replaces(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter().filter(|d| d.is_replace())
    }

    /// Require decisions in apply order
    pub fn requires(&self) -> impl Iterator<Item = &Decision> {
        self.decisions
            .iter()
            .filter(|d| matches!(d.action, Action::Require { .. }))
    }

    /// Number of decisions that edit the manifest
    pub fn change_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_change()).count()
    }

    /// Whether the plan holds no decisions
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// A requested version lower than the manifest already has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Module path
    pub name: String,
    /// Version the caller asked for
    pub requested: String,
    /// Version already in the manifest
    pub current: String,
}

/// Reconciliation output, keyed by module path in desired-set order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    decisions: Vec<Decision>,
}

impl Reconciliation {
    pub(crate) fn new(decisions: Vec<Decision>) -> Self {
        Self { decisions }
    }

    /// Decision for `name`
    pub fn get(&self, name: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.name == name)
    }

    /// Decisions in desired-set order
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Consume into decisions in desired-set order
    pub fn into_decisions(self) -> Vec<Decision> {
        self.decisions
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// The manifest after the update
    pub manifest: ManifestSnapshot,
    /// The plan that was executed
    pub plan: Plan,
    /// Unified diff of go.mod, when requested and the file changed
    pub diff: Option<String>,
}
