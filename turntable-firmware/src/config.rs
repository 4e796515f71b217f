//! Build-time configuration
//!
//! `build.rs` parses and validates `turntable.toml` and renders it here as
//! a `const`, so a bad configuration fails the build instead of the boot.

include!(concat!(env!("OUT_DIR"), "/config.rs"));
