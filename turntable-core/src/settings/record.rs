//! Settings record layout
//!
//! Packed little-endian, 10 bytes, no version field:
//!
//! ```text
//!  offset  size  field
//!  0       4     position (i32)
//!  4       1     direction (0 = CW, 1 = CCW)
//!  5       4     zero offset (i32)
//!  9       1     checksum (XOR of bytes 0..9)
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::Direction;

/// Encoded record size in bytes
pub const RECORD_LEN: usize = 10;

/// Reasons a stored record is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Stored checksum does not match the payload
    ChecksumMismatch { stored: u8, computed: u8 },
    /// Checksum is valid but the direction byte is neither 0 nor 1
    InvalidDirection(u8),
}

/// Persisted turntable settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SettingsRecord {
    /// Motor position in steps
    pub position: i32,
    /// Selected rotation direction
    pub direction: Direction,
    /// Step position of angle 0
    pub zero_offset: i32,
}

/// XOR checksum over the record payload
///
/// Folds the four little-endian bytes of `position`, then `direction`,
/// then the four bytes of `zero_offset`.
pub fn checksum(position: i32, direction: u8, zero_offset: i32) -> u8 {
    let mut sum = position.to_le_bytes().iter().fold(0u8, |acc, b| acc ^ b);
    sum ^= direction;
    zero_offset.to_le_bytes().iter().fold(sum, |acc, b| acc ^ b)
}

impl SettingsRecord {
    pub const fn new(position: i32, direction: Direction, zero_offset: i32) -> Self {
        Self {
            position,
            direction,
            zero_offset,
        }
    }

    pub fn checksum(&self) -> u8 {
        checksum(self.position, self.direction.as_u8(), self.zero_offset)
    }

    /// Encode into the packed on-store layout
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0..4].copy_from_slice(&self.position.to_le_bytes());
        buf[4] = self.direction.as_u8();
        buf[5..9].copy_from_slice(&self.zero_offset.to_le_bytes());
        buf[9] = self.checksum();
        buf
    }

    /// Decode and verify a stored record
    pub fn from_bytes(buf: &[u8; RECORD_LEN]) -> Result<Self, RecordError> {
        let position = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let direction = buf[4];
        let zero_offset = i32::from_le_bytes([buf[5], buf[6], buf[7], buf[8]]);

        let stored = buf[9];
        let computed = checksum(position, direction, zero_offset);
        if stored != computed {
            return Err(RecordError::ChecksumMismatch { stored, computed });
        }

        let direction =
            Direction::from_u8(direction).ok_or(RecordError::InvalidDirection(direction))?;

        Ok(Self::new(position, direction, zero_offset))
    }

    /// Replace the position with 0 if it lies outside `[min, max]`
    pub fn with_position_bounds(mut self, min: i32, max: i32) -> Self {
        if !(min..=max).contains(&self.position) {
            self.position = 0;
        }
        self
    }
}
