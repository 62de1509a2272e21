//! Pin allocation by number
//!
//! Board wiring lives in a `PinMap`, so pins are handed out by GPIO
//! number instead of by peripheral name. GPIO26-29 double as ADC inputs
//! and are taken directly from the peripherals instead.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;
use spritz_core::config::PinConfig;

use crate::gpio::{RpInput, RpOutput};

/// GPIOs managed by the bank (GPIO0-25)
pub const BANK_SIZE: usize = 26;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number outside the bank
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
}

/// Owner of the general purpose GPIOs
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; BANK_SIZE],
}

impl PinBank {
    pub fn new(pins: [Peri<'static, AnyPin>; BANK_SIZE]) -> Self {
        Self {
            pins: pins.map(Some),
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin(pin_num))?
            .take()
            .ok_or(PinError::AlreadyTaken(pin_num))
    }

    /// Claim an output, initially at `initial_high`
    pub fn output(&mut self, config: PinConfig, initial_high: bool) -> Result<RpOutput, PinError> {
        Ok(RpOutput::new(self.take(config.pin)?, initial_high))
    }

    /// Claim an input with the configured pull
    pub fn input(&mut self, config: PinConfig) -> Result<RpInput, PinError> {
        Ok(RpInput::new(self.take(config.pin)?, config.pin, config.pull_up))
    }
}
