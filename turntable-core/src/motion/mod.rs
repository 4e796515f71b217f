//! Motion planning
//!
//! Step-count bookkeeping and the trapezoidal delay profile, independent
//! of the pins that carry the pulses.

pub mod direction;
pub mod planner;

pub use direction::Direction;
pub use planner::{MotionState, Step, StepPlanner};
