//! Core data types for a bump request.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// One entry in the caller's requested update set.
///
/// A change either bumps `name` to `version`, or (when `replace` is set)
/// substitutes `old_name` with `name@version` through a replace directive.
/// The version is a semantic version (`v1.2.3`) or an opaque pinned
/// revision such as a commit hash.
///
/// Bump files decode straight into this type:
///
/// ```yaml
/// packages:
///   - name: github.com/fakefuzz
///     oldName: github.com/google/gofuzz
///     version: v1.2.3
///     replace: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredChange {
    /// Module path to bump (or the new path of a replacement)
    #[serde(default)]
    pub name: String,

    /// Requested version or pinned revision
    #[serde(default)]
    pub version: String,

    /// Module path being replaced, if this is a replacement
    #[serde(default, alias = "oldname", alias = "old_name")]
    pub old_name: Option<String>,

    /// Whether the caller asked for a replace directive
    #[serde(default)]
    pub replace: bool,

    /// Explicit apply-order index. Entries without one are applied in
    /// arrival order.
    #[serde(skip)]
    pub sequence_index: Option<usize>,
}

impl DesiredChange {
    /// A plain bump of `name` to `version`.
    pub fn require(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            old_name: None,
            replace: false,
            sequence_index: None,
        }
    }

    /// Replace `old_name` with `name@version`.
    pub fn replace(
        old_name: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            old_name: Some(old_name.into()),
            replace: true,
            sequence_index: None,
        }
    }

    /// Set the explicit apply-order index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.sequence_index = Some(index);
        self
    }

    /// Old module path, treating an empty string as absent.
    pub fn old_name(&self) -> Option<&str> {
        self.old_name.as_deref().filter(|s| !s.is_empty())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingName);
        }
        if self.version.trim().is_empty() {
            return Err(Error::MissingVersion {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// The ordered collection of requested changes.
///
/// Entries keep their arrival order and are indexed by module path, so no
/// behaviour ever depends on hash-map iteration order. Inserting a change
/// for a path that is already present overwrites the earlier entry in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredSet {
    changes: Vec<DesiredChange>,
    index: HashMap<String, usize>,
}

impl DesiredSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from changes in arrival order.
    pub fn from_changes(changes: impl IntoIterator<Item = DesiredChange>) -> Result<Self> {
        let mut set = Self::new();
        for change in changes {
            set.insert(change)?;
        }
        Ok(set)
    }

    /// Insert a change, returning the entry it overwrote (if any).
    ///
    /// # Errors
    /// Returns an error if the change has no name or no version
    pub fn insert(&mut self, change: DesiredChange) -> Result<Option<DesiredChange>> {
        change.validate()?;

        if let Some(&position) = self.index.get(&change.name) {
            let previous = std::mem::replace(&mut self.changes[position], change);
            return Ok(Some(previous));
        }

        self.index.insert(change.name.clone(), self.changes.len());
        self.changes.push(change);
        Ok(None)
    }

    /// Look up a change by module path
    pub fn get(&self, name: &str) -> Option<&DesiredChange> {
        self.index.get(name).map(|&i| &self.changes[i])
    }

    /// Whether a change for `name` is present
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of changes
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterate changes in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &DesiredChange> {
        self.changes.iter()
    }

    /// Iterate changes with their effective apply-order index.
    ///
    /// The effective index is the explicit `sequence_index` when set, and
    /// the arrival position otherwise.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &DesiredChange)> {
        self.changes
            .iter()
            .enumerate()
            .map(|(position, change)| (change.sequence_index.unwrap_or(position), change))
    }
}

impl<'a> IntoIterator for &'a DesiredSet {
    type Item = &'a DesiredChange;
    type IntoIter = std::slice::Iter<'a, DesiredChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
