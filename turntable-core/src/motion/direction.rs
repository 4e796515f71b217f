//! Turntable rotation direction

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation direction selected by the operator
///
/// `CounterClockwise` inverts the step direction output, so positive
/// logical steps turn the table the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation
    #[default]
    Clockwise,
    /// Counter-clockwise rotation
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Whether the direction output is inverted for this direction
    pub fn is_inverted(self) -> bool {
        self == Direction::CounterClockwise
    }

    /// Persisted encoding: 0 = CW, 1 = CCW
    pub fn as_u8(self) -> u8 {
        match self {
            Direction::Clockwise => 0,
            Direction::CounterClockwise => 1,
        }
    }

    /// Decode the persisted byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Direction::Clockwise),
            1 => Some(Direction::CounterClockwise),
            _ => None,
        }
    }
}
