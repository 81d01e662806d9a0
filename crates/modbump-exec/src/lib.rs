//! Go toolchain execution port for modbump.
//!
//! Every manifest mutation and dependency fetch is delegated to the external
//! `go` command. This crate provides a [`Toolchain`] trait describing those
//! calls, so the update engine can be driven by the real toolchain
//! ([`GoToolchain`]) or by a fake in tests.
//!
//! # Example
//!
//! ```no_run
//! use modbump_exec::{GoToolchain, Toolchain};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> modbump_exec::ExecResult<()> {
//! let go = GoToolchain::new().with_timeout(Duration::from_secs(300));
//! let version = go.detect_version().await?;
//! go.fetch_and_add("github.com/google/uuid", "v1.4.0", Path::new(".")).await?;
//! println!("bumped with go {}", version);
//! # Ok(())
//! # }
//! ```

mod error;
mod toolchain;

pub mod native;

pub use error::{ExecError, ExecResult};
pub use native::{parse_go_version, GoToolchain};
pub use toolchain::Toolchain;
