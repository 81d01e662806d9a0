//! modbump core - the caller-facing data model.
//!
//! This crate defines what a caller asks for, independent of where the
//! request came from (command-line flags or a bump file) and of how it is
//! carried out:
//!
//! - [`DesiredChange`]: one requested package/version pair, optionally a
//!   replacement of another module path
//! - [`DesiredSet`]: the ordered collection of requested changes with a
//!   by-name index
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   modbump-cli   │  (flags, logging, output)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │ modbump-config  │────▶│  modbump-core   │  (this crate)
//! └────────┬────────┘     └─────────────────┘
//!          │                       ▲
//!          ▼                       │
//! ┌─────────────────┐     ┌─────────────────┐
//! │  modbump-deps   │────▶│  modbump-exec   │  (go toolchain port)
//! └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use modbump_core::{DesiredChange, DesiredSet};
//!
//! let mut set = DesiredSet::new();
//! set.insert(DesiredChange::require("github.com/google/uuid", "v1.4.0"))?;
//! set.insert(DesiredChange::replace(
//!     "github.com/google/gofuzz",
//!     "github.com/fakefuzz",
//!     "v1.2.3",
//! ))?;
//!
//! assert_eq!(set.len(), 2);
//! assert!(set.contains("github.com/fakefuzz"));
//! # Ok::<(), modbump_core::Error>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{DesiredChange, DesiredSet};
