//! Settings persistence

pub mod settings;

pub use settings::{Loaded, PersistentStore, SettingsFault};
