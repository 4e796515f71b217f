//! ADC channel for the angle potentiometer
//!
//! RP2040 has a single 12-bit ADC; GPIO26-29 are channels 0-3.

use embassy_rp::adc::{Adc, Blocking, Channel};
use turntable_hal::AnalogInput;

/// Full-scale reading of the 12-bit ADC
pub const ADC_MAX: u16 = 4095;

/// One ADC channel read in blocking mode
///
/// A failed conversion repeats the previous sample.
pub struct AdcInput<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
    last: u16,
}

impl<'d> AdcInput<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>) -> Self {
        Self {
            adc,
            channel,
            last: 0,
        }
    }
}

impl AnalogInput for AdcInput<'_> {
    fn read_raw(&mut self) -> u16 {
        if let Ok(sample) = self.adc.blocking_read(&mut self.channel) {
            self.last = sample.min(ADC_MAX);
        }
        self.last
    }

    fn max_raw(&self) -> u16 {
        ADC_MAX
    }
}
