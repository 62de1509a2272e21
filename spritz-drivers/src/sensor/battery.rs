//! Battery voltage through a resistor divider
//!
//! Circuit: VBAT -- R_top -- ADC_PIN -- R_bottom -- GND
//!
//! V_bat = V_adc * (R_top + R_bottom) / R_bottom

use spritz_core::traits::{BatterySensor, SensorError};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

impl<T: AdcReader + ?Sized> AdcReader for &mut T {
    fn read(&mut self) -> Result<u16, ()> {
        (**self).read()
    }
}

/// Readings at or below this count mean the divider is not connected
const DISCONNECTED_COUNTS: u16 = 10;

/// Battery sensor on a resistor divider
pub struct BatteryDivider<ADC> {
    adc: ADC,
    /// ADC reference voltage in mV
    vref_mv: u16,
    r_top_ohms: u32,
    r_bottom_ohms: u32,
    /// ADC full scale (4096 for 12-bit)
    adc_max: u16,
}

impl<ADC> BatteryDivider<ADC> {
    /// Create a new divider sensor
    ///
    /// # Arguments
    /// - `adc`: ADC channel wired to the divider midpoint
    /// - `vref_mv`: Reference voltage in millivolts (3300 on the RP2040)
    /// - `r_top_ohms`, `r_bottom_ohms`: divider resistors
    pub fn new(adc: ADC, vref_mv: u16, r_top_ohms: u32, r_bottom_ohms: u32) -> Self {
        Self {
            adc,
            vref_mv,
            r_top_ohms,
            r_bottom_ohms,
            adc_max: 4096,
        }
    }

    /// Convert a raw ADC count to battery millivolts
    pub fn counts_to_millivolts(&self, counts: u16) -> Result<u16, SensorError> {
        if counts <= DISCONNECTED_COUNTS {
            return Err(SensorError::Disconnected);
        }
        if counts >= self.adc_max || self.r_bottom_ohms == 0 {
            return Err(SensorError::OutOfRange);
        }

        let pin_mv = counts as u64 * self.vref_mv as u64 / self.adc_max as u64;
        let total = self.r_top_ohms as u64 + self.r_bottom_ohms as u64;
        let bat_mv = pin_mv * total / self.r_bottom_ohms as u64;

        u16::try_from(bat_mv).map_err(|_| SensorError::OutOfRange)
    }
}

impl<ADC: AdcReader> BatterySensor for BatteryDivider<ADC> {
    fn read_millivolts(&mut self) -> Result<u16, SensorError> {
        let counts = self.adc.read().map_err(|_| SensorError::AdcError)?;
        self.counts_to_millivolts(counts)
    }
}

/// Dummy ADC for testing (returns a fixed value)
#[cfg(test)]
pub struct DummyAdc(pub Result<u16, ()>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 100k/100k halves the battery voltage
    fn halving(counts: u16) -> BatteryDivider<DummyAdc> {
        BatteryDivider::new(DummyAdc(Ok(counts)), 3300, 100_000, 100_000)
    }

    #[test]
    fn test_half_divider() {
        // 2048 counts = 1650 mV at the pin = 3300 mV battery
        let mut sensor = halving(2048);
        assert_eq!(sensor.read_millivolts(), Ok(3300));
    }

    #[test]
    fn test_disconnected() {
        let mut sensor = halving(0);
        assert_eq!(sensor.read_millivolts(), Err(SensorError::Disconnected));
    }

    #[test]
    fn test_adc_failure() {
        let mut sensor = BatteryDivider::new(DummyAdc(Err(())), 3300, 100_000, 100_000);
        assert_eq!(sensor.read_millivolts(), Err(SensorError::AdcError));
    }

    #[test]
    fn test_full_scale_out_of_range() {
        let sensor = halving(0);
        assert_eq!(
            sensor.counts_to_millivolts(4096),
            Err(SensorError::OutOfRange)
        );
    }

    proptest! {
        #[test]
        fn prop_monotonic(a in 11u16..4095, b in 11u16..4095) {
            let sensor = halving(0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let mv_lo = sensor.counts_to_millivolts(lo).unwrap();
            let mv_hi = sensor.counts_to_millivolts(hi).unwrap();
            prop_assert!(mv_lo <= mv_hi);
            prop_assert!(mv_hi <= 6600);
        }
    }
}
