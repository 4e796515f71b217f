//! Persisted settings
//!
//! Position, direction and zero offset survive power cycles in a small
//! fixed-layout record.

pub mod record;

pub use record::{checksum, RecordError, SettingsRecord, RECORD_LEN};
