//! Hardware configuration types
//!
//! Pin assignments for the motor, LEDs, button and sensors.

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an active-low pin with pull-up enabled (buttons to GND)
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }

    /// Map a raw level to the logical "asserted" value
    pub const fn is_asserted(&self, high: bool) -> bool {
        high != self.inverted
    }
}

/// Board pin map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    /// H-bridge input 1 (forward when high)
    pub motor_in1: PinConfig,
    /// H-bridge input 2
    pub motor_in2: PinConfig,
    pub led_red: PinConfig,
    pub led_green: PinConfig,
    pub led_blue: PinConfig,
    /// Spray button, wakes on falling edge
    pub button: PinConfig,
    /// Digital light sensor output, wakes on either edge
    pub light: PinConfig,
    /// Heartbeat LED (optional)
    pub activity_led: Option<PinConfig>,
    /// Battery divider ADC input (optional)
    pub battery_adc: Option<PinConfig>,
}

/// GPIOs on the RP2040 (GPIO0-29)
pub const GPIO_COUNT: u8 = 30;

impl PinMap {
    /// Reference wiring of the Auto-Spray board
    pub const DEFAULT: Self = Self {
        motor_in1: PinConfig::new(6),
        motor_in2: PinConfig::new(7),
        led_red: PinConfig::new(9),
        led_green: PinConfig::new(10),
        led_blue: PinConfig::new(11),
        button: PinConfig::with_pullup(2),
        light: PinConfig::inverted(3),
        activity_led: None,
        battery_adc: Some(PinConfig::new(26)),
    };

    /// Every assigned GPIO, optional ones as `None` when unused
    const fn assigned(&self) -> [Option<u8>; 9] {
        [
            Some(self.motor_in1.pin),
            Some(self.motor_in2.pin),
            Some(self.led_red.pin),
            Some(self.led_green.pin),
            Some(self.led_blue.pin),
            Some(self.button.pin),
            Some(self.light.pin),
            match self.activity_led {
                Some(led) => Some(led.pin),
                None => None,
            },
            match self.battery_adc {
                Some(adc) => Some(adc.pin),
                None => None,
            },
        ]
    }

    /// Check whether any GPIO number is outside GPIO0-29
    pub const fn has_invalid_pin(&self) -> bool {
        let pins = self.assigned();
        let mut i = 0;
        while i < pins.len() {
            if let Some(pin) = pins[i] {
                if pin >= GPIO_COUNT {
                    return true;
                }
            }
            i += 1;
        }
        false
    }

    /// Check whether any GPIO is assigned twice
    ///
    /// Pins outside GPIO0-29 are reported by [`has_invalid_pin`](Self::has_invalid_pin)
    /// and skipped here.
    pub const fn has_conflict(&self) -> bool {
        let pins = self.assigned();

        // Bitmask allocator, same idea as a GPIO allocator but usable in const
        let mut allocated: u32 = 0;
        let mut i = 0;
        while i < pins.len() {
            if let Some(pin) = pins[i] {
                if pin < GPIO_COUNT {
                    let mask = 1u32 << pin;
                    if allocated & mask != 0 {
                        return true;
                    }
                    allocated |= mask;
                }
            }
            i += 1;
        }
        false
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}
