pub mod bump;

pub use bump::{handle_bump, BumpArgs};
