//! Board-agnostic core logic for the Spritz auto-spray freshener
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (spray motor, battery sensor)
//! - LED indicator and status patterns
//! - Spray pulse sequencer
//! - Power/sleep manager
//! - Device state machine
//! - Button and light sensor input handling
//! - Spray trigger policies
//! - Main-loop controller
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod battery;
pub mod config;
pub mod controller;
pub mod input;
pub mod led;
pub mod power;
pub mod spray;
pub mod state;
pub mod traits;
pub mod trigger;

#[cfg(test)]
mod testing;
