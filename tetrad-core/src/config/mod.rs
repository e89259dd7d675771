//! Configuration types
//!
//! Board-agnostic configuration structures, filled from the embedded
//! `device.toml` at boot and passed by value to whoever needs them.

pub mod hardware;
pub mod parse;
pub mod types;

pub use hardware::*;
pub use parse::{parse_config, ParseError};
pub use types::*;
