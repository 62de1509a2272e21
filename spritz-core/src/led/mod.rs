//! Tri-color LED indicator
//!
//! [`LedIndicator`] takes logical on/off values per channel and writes the
//! physical levels for the board's wiring. Callers never see polarity.
//! Status patterns (mode color, blink confirmation, battery) live in
//! [`status`] and are built on top of this primitive.

pub mod status;

use spritz_hal::OutputPin;

use crate::config::LedWiring;
use crate::traits::Quiesce;

pub use status::{ActivityLed, BlinkConfirm, StatusIndicator};

/// Logical state of one LED channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    On,
}

impl LedColor {
    pub const fn is_on(self) -> bool {
        matches!(self, LedColor::On)
    }
}

impl From<bool> for LedColor {
    fn from(on: bool) -> Self {
        if on {
            LedColor::On
        } else {
            LedColor::Off
        }
    }
}

/// Combined logical color of the three channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbColor {
    pub red: LedColor,
    pub green: LedColor,
    pub blue: LedColor,
}

impl RgbColor {
    pub const OFF: Self = Self::new(false, false, false);
    pub const RED: Self = Self::new(true, false, false);
    pub const GREEN: Self = Self::new(false, true, false);
    pub const BLUE: Self = Self::new(false, false, true);
    pub const YELLOW: Self = Self::new(true, true, false);
    pub const CYAN: Self = Self::new(false, true, true);
    pub const MAGENTA: Self = Self::new(true, false, true);
    pub const WHITE: Self = Self::new(true, true, true);

    pub const fn new(red: bool, green: bool, blue: bool) -> Self {
        Self {
            red: if red { LedColor::On } else { LedColor::Off },
            green: if green { LedColor::On } else { LedColor::Off },
            blue: if blue { LedColor::On } else { LedColor::Off },
        }
    }

    pub const fn is_off(&self) -> bool {
        !self.red.is_on() && !self.green.is_on() && !self.blue.is_on()
    }
}

impl LedWiring {
    /// Physical pin level (true = HIGH) that displays `color`
    pub const fn level(self, color: LedColor) -> bool {
        match self {
            LedWiring::CommonAnode => !color.is_on(),
            LedWiring::CommonCathode => color.is_on(),
        }
    }
}

/// RGB status LED on three GPIOs
pub struct LedIndicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
    wiring: LedWiring,
    current: RgbColor,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> LedIndicator<R, G, B> {
    /// Take ownership of the channel pins and switch the LED off
    pub fn new(red: R, green: G, blue: B, wiring: LedWiring) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            wiring,
            current: RgbColor::OFF,
        };
        led.off();
        led
    }

    /// Write one logical value per channel
    ///
    /// Idempotent: repeating a call rewrites the same levels.
    pub fn update_led(&mut self, red: LedColor, green: LedColor, blue: LedColor) {
        self.red.set_state(self.wiring.level(red));
        self.green.set_state(self.wiring.level(green));
        self.blue.set_state(self.wiring.level(blue));
        self.current = RgbColor { red, green, blue };
    }

    /// Display a combined color
    pub fn show(&mut self, color: RgbColor) {
        self.update_led(color.red, color.green, color.blue);
    }

    /// All channels off
    pub fn off(&mut self) {
        self.show(RgbColor::OFF);
    }

    /// Release the three channel pins
    ///
    /// The next write drives them again.
    pub fn disable(&mut self) {
        self.red.disable();
        self.green.disable();
        self.blue.disable();
    }

    /// Last color written
    pub fn current(&self) -> RgbColor {
        self.current
    }

    pub fn wiring(&self) -> LedWiring {
        self.wiring
    }

    /// Give the pins back
    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Quiesce for LedIndicator<R, G, B> {
    fn quiesce(&mut self) {
        self.disable();
    }
}
