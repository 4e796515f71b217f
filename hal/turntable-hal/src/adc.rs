//! Analog input abstraction

/// A single ADC channel
///
/// Readings are integers in `0..=max_raw()`. A conversion failure is the
/// implementation's problem to absorb (e.g. by returning the previous
/// sample); consumers treat every reading as valid and clamp it.
pub trait AnalogInput {
    /// Take one sample
    fn read_raw(&mut self) -> u16;

    /// Full-scale reading (1023 for a 10-bit ADC, 4095 for 12-bit)
    fn max_raw(&self) -> u16;
}
