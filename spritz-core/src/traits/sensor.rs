//! Sensor traits

/// Errors that can occur reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor not connected or shorted
    Disconnected,
    /// Reading out of valid range
    OutOfRange,
    /// ADC read failed
    AdcError,
}

/// Battery voltage sensor
pub trait BatterySensor {
    /// Read the battery voltage in millivolts
    fn read_millivolts(&mut self) -> Result<u16, SensorError>;
}

impl<T: BatterySensor + ?Sized> BatterySensor for &mut T {
    fn read_millivolts(&mut self) -> Result<u16, SensorError> {
        (**self).read_millivolts()
    }
}
