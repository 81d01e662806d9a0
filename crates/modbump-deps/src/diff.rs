//! Unified diff of go.mod before and after a run

use similar::TextDiff;

/// Unified diff between two versions of go.mod, or `None` when they are
/// identical.
pub fn manifest_diff(before: &str, after: &str) -> Option<String> {
    if before == after {
        return None;
    }

    let diff = TextDiff::from_lines(before, after);
    Some(
        diff.unified_diff()
            .context_radius(3)
            .header("go.mod.orig", "go.mod")
            .to_string(),
    )
}
