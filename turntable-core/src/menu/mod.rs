//! Menu state machine and target resolution
//!
//! The menu is a small explicit state machine driven by the encoder
//! button. [`TargetResolver`] wraps it with the dial handling, sensor
//! fusion and the target position the motor follows.

pub mod events;
pub mod machine;
pub mod resolver;

pub use events::{ButtonEvent, MenuEvent};
pub use machine::{DigitMode, MainItem, Screen, ITEM_COUNT};
pub use resolver::{OverridePolicy, TargetResolver};
