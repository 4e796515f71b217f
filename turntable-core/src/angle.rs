//! Angle and step arithmetic
//!
//! Positions are logical step counts in `[0, steps_360)`; angles are
//! degrees in `[0, 360)`. Every mutation of a position goes through
//! [`wrap_steps`] so a position never leaves that range.

/// Degrees in one turn
pub const FULL_TURN_DEG: u16 = 360;

/// Renormalize a step count into `[0, steps_360)`
#[inline]
pub fn wrap_steps(steps: i32, steps_360: i32) -> i32 {
    steps.rem_euclid(steps_360)
}

/// Signed sum of a position and a delta, wrapped into one turn
#[inline]
pub fn offset_steps(position: i32, delta: i32, steps_360: i32) -> i32 {
    ((position as i64 + delta as i64).rem_euclid(steps_360 as i64)) as i32
}

/// Convert a whole-degree angle to steps (truncating)
pub fn angle_to_steps(angle_deg: u16, steps_360: i32) -> i32 {
    (angle_deg as i64 * steps_360 as i64 / FULL_TURN_DEG as i64) as i32
}

/// Convert a step count to the nearest whole degree in `[0, 360)`
///
/// Rounds rather than truncates so that `steps_to_angle(angle_to_steps(a))`
/// returns `a` for every whole degree when `steps_360 > 720`.
pub fn steps_to_angle(steps: i32, steps_360: i32) -> u16 {
    let steps = wrap_steps(steps, steps_360) as i64;
    let turn = steps_360 as i64;
    let deg = (steps * FULL_TURN_DEG as i64 + turn / 2) / turn;
    (deg % FULL_TURN_DEG as i64) as u16
}

/// Shortest distance between two whole-degree angles
pub fn angle_distance(a: u16, b: u16) -> u16 {
    let d = a.abs_diff(b) % FULL_TURN_DEG;
    d.min(FULL_TURN_DEG - d)
}

/// Scale a raw ADC sample to degrees, clamped to `[0, max_angle]`
pub fn raw_to_degrees(raw: u16, max_raw: u16, ref_voltage: f32, max_angle: f32) -> f32 {
    if max_raw == 0 {
        return 0.0;
    }
    let voltage = raw as f32 / max_raw as f32 * ref_voltage;
    let angle = voltage / ref_voltage * max_angle;
    angle.clamp(0.0, max_angle)
}

/// Arithmetic mean of the buffered samples, 0 when empty
pub fn mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

/// Apply the zero offset to a filtered angle
///
/// Results within `snap_deg` of zero become exactly zero; everything else
/// wraps into `[0, max_angle)`.
pub fn zero_adjust(filtered: f32, zero_offset: f32, max_angle: f32, snap_deg: f32) -> f32 {
    let mut adjusted = filtered - zero_offset;
    if adjusted > -snap_deg && adjusted < snap_deg {
        return 0.0;
    }
    if adjusted < 0.0 {
        adjusted += max_angle;
    } else if adjusted >= max_angle {
        adjusted -= max_angle;
    }
    // Both operands lie in [0, max_angle]; one correction suffices
    adjusted.clamp(0.0, max_angle)
}
