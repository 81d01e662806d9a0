pub mod bumpfile;
pub mod error;
pub mod flags;
pub mod types;

pub use bumpfile::{parse_bump_file, parse_bump_str, BumpFileFormat};
pub use error::ConfigError;
pub use flags::{merge_replaces, parse_packages, parse_replaces};
pub use types::RunConfig;
