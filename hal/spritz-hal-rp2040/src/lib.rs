//! RP2040-specific HAL for the Spritz freshener firmware
//!
//! This crate provides RP2040 implementations of the `spritz-hal`
//! traits:
//!
//! - GPIO outputs that can be released before sleep
//! - Wake-capable inputs on the IO_BANK0 edge latches
//! - Pin allocation by number from the board pin map
//! - WFI-based sleep driver

#![no_std]

pub mod gpio;
pub mod pins;
pub mod power;

pub use gpio::{service_wake_sources, RpInput, RpOutput};
pub use pins::{PinBank, PinError};
pub use power::RpPower;
