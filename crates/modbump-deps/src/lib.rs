//! # modbump-deps
//!
//! go.mod dependency updates driven through the go toolchain.
//!
//! This crate provides functionality to:
//! - Parse go.mod into immutable snapshots and query effective versions
//! - Compare Go module versions, including shorthands and pseudo-versions
//! - Reconcile a requested set of changes against the current manifest,
//!   rejecting self-bumps and downgrades before anything is edited
//! - Apply the resulting plan through a [`Toolchain`](modbump_exec::Toolchain)
//! - Verify the outcome and diff the manifest
//! - Keep go.work and `vendor/` in sync with the module
//!
//! ## Architecture
//!
//! Reconciliation and ordering are pure functions of the desired set and a
//! [`ManifestSnapshot`]. Every mutation of go.mod goes through the toolchain,
//! after which a fresh snapshot is loaded:
//!
//! ```text
//! load ─▶ reconcile ─▶ order ─▶ apply ─▶ (tidy) ─▶ load ─▶ verify ─▶ diff
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use modbump_config::RunConfig;
//! use modbump_core::{DesiredChange, DesiredSet};
//! use modbump_deps::run_update;
//! use modbump_exec::GoToolchain;
//!
//! # async fn example() -> modbump_deps::Result<()> {
//! let desired = DesiredSet::from_changes([
//!     DesiredChange::require("github.com/google/uuid", "v1.4.0"),
//! ])?;
//! let config = RunConfig::new("path/to/module");
//!
//! let outcome = run_update(&desired, &config, &GoToolchain::new()).await?;
//! for decision in outcome.plan.decisions() {
//!     println!("{}: {:?}", decision.name, decision.action);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod apply;
pub mod diff;
pub mod error;
pub mod gomod;
pub mod order;
pub mod reconcile;
pub mod types;
pub mod update;
pub mod verify;
pub mod version;

#[cfg(test)]
mod testing;

pub use error::{Error, ErrorKind, Result};
pub use gomod::{GoWorkspace, ManifestSnapshot, ModuleVersion, ParseError, Replace, Require};
pub use types::{Action, Conflict, Decision, Plan, Reconciliation, UpdateOutcome};

pub use apply::apply;
pub use diff::manifest_diff;
pub use order::order_keys;
pub use reconcile::reconcile;
pub use update::run_update;
pub use verify::verify;
pub use version::{compare, is_pseudo_version, is_valid, GoVersion};
