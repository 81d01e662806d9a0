//! Terminal output for a finished run

use colored::Colorize;
use modbump_deps::{
    is_pseudo_version, is_valid, Action, Decision, ManifestSnapshot, UpdateOutcome,
};
use std::io::{self, Write};

/// Print the per-package summary followed by the go.mod diff, if any.
pub fn print_outcome<W: Write>(
    writer: &mut W,
    outcome: &UpdateOutcome,
    color: bool,
) -> io::Result<()> {
    for decision in outcome.plan.decisions() {
        print_decision(writer, decision, &outcome.manifest, color)?;
    }

    if let Some(diff) = &outcome.diff {
        writeln!(writer)?;
        print_diff(writer, diff, color)?;
    }
    Ok(())
}

/// The pseudo-version go recorded for a pinned revision, if it did.
fn pinned_as<'a>(decision: &Decision, manifest: &'a ManifestSnapshot) -> Option<&'a str> {
    if is_valid(&decision.version) {
        return None;
    }
    manifest
        .effective_version(&decision.name)
        .filter(|v| is_pseudo_version(v))
}

fn print_decision<W: Write>(
    writer: &mut W,
    decision: &Decision,
    manifest: &ManifestSnapshot,
    color: bool,
) -> io::Result<()> {
    let target = format!("{}@{}", decision.name, decision.version);
    let (mark, line) = match (&decision.action, pinned_as(decision, manifest)) {
        (Action::Require { .. }, Some(resolved)) => {
            ("✓", format!("pinned {} as {}", target, resolved))
        }
        (Action::Replace { old_path }, _) => {
            ("✓", format!("replaced {} => {}", old_path, target))
        }
        (Action::Require { .. }, None) => match &decision.current_version {
            Some(current) => (
                "✓",
                format!("updated {} {} -> {}", decision.name, current, decision.version),
            ),
            None => ("✓", format!("added {}", target)),
        },
        (Action::Unchanged, _) => {
            ("=", format!("{} already at {}", decision.name, decision.version))
        }
    };

    if color {
        let mark = match decision.action {
            Action::Unchanged => mark.dimmed(),
            _ => mark.green(),
        };
        writeln!(writer, "{} {}", mark, line)
    } else {
        writeln!(writer, "{} {}", mark, line)
    }
}

/// Print a unified diff, coloured per line when `color` is set.
pub fn print_diff<W: Write>(writer: &mut W, diff: &str, color: bool) -> io::Result<()> {
    for line in diff.lines() {
        if !color {
            writeln!(writer, "{}", line)?;
            continue;
        }

        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        writeln!(writer, "{}", styled)?;
    }
    Ok(())
}
