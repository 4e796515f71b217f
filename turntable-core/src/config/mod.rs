//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware parses
//! `turntable.toml` at build time and embeds the result as a constant.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
