//! Potentiometer-based absolute angle sensor
//!
//! Raw ADC samples are scaled to degrees and smoothed with a moving
//! average over the last `N` samples. A zero offset captured by
//! [`AbsoluteAngleSensor::set_zero`] is subtracted before the result is
//! wrapped into one turn. Out-of-range samples are clamped, never reported.

use embedded_hal::delay::DelayNs;
use heapless::HistoryBuffer;
use turntable_core::angle::{mean, raw_to_degrees, zero_adjust};
use turntable_core::config::SensorConfig;
use turntable_hal::AnalogInput;

/// Moving-average window
pub const DEFAULT_FILTER_SAMPLES: usize = 8;

/// Filtered, zero-adjusted absolute angle
pub struct AbsoluteAngleSensor<A, const N: usize = DEFAULT_FILTER_SAMPLES> {
    adc: A,
    config: SensorConfig,
    filter: HistoryBuffer<f32, N>,
    /// Raw angle that reads as zero
    zero_offset: f32,
    last_angle: Option<u16>,
    last_check_ms: Option<u64>,
}

impl<A: AnalogInput, const N: usize> AbsoluteAngleSensor<A, N> {
    pub fn new(adc: A, config: SensorConfig) -> Self {
        Self {
            adc,
            config,
            filter: HistoryBuffer::new(),
            zero_offset: 0.0,
            last_angle: None,
            last_check_ms: None,
        }
    }

    /// Take the first reading
    pub fn begin(&mut self) {
        let angle = self.read_angle_int();
        self.last_angle = Some(angle);
    }

    /// Single unfiltered sample in degrees, clamped to `[0, max_angle]`
    pub fn read_raw_angle(&mut self) -> f32 {
        let raw = self.adc.read_raw();
        raw_to_degrees(
            raw,
            self.adc.max_raw(),
            self.config.ref_voltage,
            self.config.max_angle,
        )
    }

    /// Sample, push into the filter and return the zero-adjusted mean
    pub fn read_angle(&mut self) -> f32 {
        let sample = self.read_raw_angle();
        self.filter.write(sample);
        zero_adjust(
            mean(self.filter.as_slice()),
            self.zero_offset,
            self.config.max_angle,
            self.config.zero_snap_deg,
        )
    }

    /// Whole degrees, truncated
    pub fn read_angle_int(&mut self) -> u16 {
        let angle = self.read_angle() as u16;
        // max_angle itself wraps to zero
        if angle as f32 >= self.config.max_angle {
            0
        } else {
            angle
        }
    }

    /// Time-gated change detection
    ///
    /// Samples at most once per `poll_interval_ms` and reports whether the
    /// whole-degree angle differs from the previous sample.
    pub fn has_changed(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_check_ms {
            if now_ms.saturating_sub(last) < self.config.poll_interval_ms as u64 {
                return false;
            }
        }
        self.last_check_ms = Some(now_ms);

        let angle = self.read_angle_int();
        let changed = self.last_angle != Some(angle);
        self.last_angle = Some(angle);
        changed
    }

    /// Most recent whole-degree angle seen by [`Self::begin`] or [`Self::has_changed`]
    pub fn last_angle(&self) -> Option<u16> {
        self.last_angle
    }

    /// Calibrate the current pose as angle zero
    ///
    /// Blocks for the settle time plus one sample interval per sample
    /// (about 180 ms with the defaults).
    pub fn set_zero<D: DelayNs>(&mut self, delay: &mut D) {
        self.filter.clear();
        delay.delay_ms(self.config.zero_settle_ms);

        let samples = self.config.zero_samples.max(1);
        let mut sum = 0.0f32;
        for _ in 0..samples {
            sum += self.read_raw_angle();
            delay.delay_us(self.config.zero_sample_interval_us);
        }
        let zero = sum / samples as f32;

        self.zero_offset = zero;
        // Pre-fill so the next reading is already settled
        self.filter.clear_with(zero);
        self.last_angle = Some(0);
    }

    pub fn zero_offset(&self) -> f32 {
        self.zero_offset
    }

    /// Restore a previously captured zero offset
    pub fn set_zero_offset(&mut self, zero_offset: f32) {
        self.zero_offset = zero_offset.clamp(0.0, self.config.max_angle);
    }

    /// Shift the zero offset so the current pose reads `angle_deg`
    ///
    /// Uses the samples already in the filter; call after [`Self::begin`].
    /// The reading lands in the middle of the whole degree so that sample
    /// noise does not truncate it to the neighbour.
    pub fn align_to(&mut self, angle_deg: u16) {
        let max = self.config.max_angle;
        let wanted = if angle_deg == 0 {
            0.0
        } else {
            angle_deg as f32 + 0.5
        };
        let mut offset = mean(self.filter.as_slice()) - wanted;
        if offset < 0.0 {
            offset += max;
        } else if offset >= max {
            offset -= max;
        }
        self.set_zero_offset(offset);
        self.last_angle = Some(self.read_angle_int());
    }

    pub fn adc(&mut self) -> &mut A {
        &mut self.adc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ADC returning a fixed value
    struct DummyAdc(u16);

    impl AnalogInput for DummyAdc {
        fn read_raw(&mut self) -> u16 {
            self.0
        }

        fn max_raw(&self) -> u16 {
            4095
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_us: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_us += (ns / 1000) as u64;
        }
    }

    fn sensor(raw: u16) -> AbsoluteAngleSensor<DummyAdc> {
        AbsoluteAngleSensor::new(DummyAdc(raw), SensorConfig::default())
    }

    #[test]
    fn test_scaling() {
        let mut s = sensor(0);
        assert_eq!(s.read_angle_int(), 0);

        let mut s = sensor(4095);
        assert_eq!(s.read_raw_angle(), 360.0);
        // Full scale wraps to zero
        assert_eq!(s.read_angle_int(), 0);

        let mut s = sensor(1024);
        assert_eq!(s.read_angle_int(), 90);
    }

    #[test]
    fn test_align_to_current_pose() {
        let mut s = sensor(1024);
        s.begin();
        assert_eq!(s.last_angle(), Some(90));

        s.align_to(45);
        assert_eq!(s.last_angle(), Some(45));
        assert_eq!(s.read_angle_int(), 45);

        // Offset wraps below zero
        s.align_to(270);
        assert_eq!(s.read_angle_int(), 270);

        s.align_to(0);
        assert_eq!(s.read_angle(), 0.0);

        // Later movement is relative to the aligned pose
        s.align_to(100);
        s.adc().0 = 1138;
        for _ in 0..DEFAULT_FILTER_SAMPLES {
            s.read_angle();
        }
        assert_eq!(s.read_angle_int(), 110);
    }

    #[test]
    fn test_moving_average() {
        let mut s = sensor(0);
        s.read_angle();
        s.adc().0 = 2048;
        // Mean of {0, ~180}
        let angle = s.read_angle();
        assert!(angle > 89.0 && angle < 91.0);
        // Window fills with the new value
        for _ in 0..DEFAULT_FILTER_SAMPLES {
            s.read_angle();
        }
        assert_eq!(s.read_angle_int(), 180);
    }

    #[test]
    fn test_has_changed_is_time_gated() {
        let mut s = sensor(1024);
        s.begin();
        assert_eq!(s.last_angle(), Some(90));
        assert!(!s.has_changed(0));

        for _ in 0..DEFAULT_FILTER_SAMPLES {
            s.adc().0 = 2048;
            s.read_angle();
        }
        // Too soon after the previous check
        assert!(!s.has_changed(5));
        assert!(s.has_changed(10));
        assert_eq!(s.last_angle(), Some(180));
        assert!(!s.has_changed(20));
    }

    #[test]
    fn test_set_zero() {
        let mut s = sensor(1024);
        let mut delay = CountingDelay::default();
        s.set_zero(&mut delay);
        assert!(s.zero_offset() > 89.9 && s.zero_offset() < 90.1);
        assert_eq!(delay.total_us, 50_000 + 128 * 1000);
        assert_eq!(s.read_angle(), 0.0);
        assert_eq!(s.last_angle(), Some(0));

        // Rotate back by 10 degrees
        s.adc().0 = 910;
        for _ in 0..DEFAULT_FILTER_SAMPLES {
            s.read_angle();
        }
        assert_eq!(s.read_angle_int(), 349);
    }
}
