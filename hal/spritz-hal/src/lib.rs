//! Spritz Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the control logic relies on.
//! Board support (the RP2040 firmware, host test doubles) implements them;
//! the core never touches registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  spritz-firmware (board wiring)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spritz-core (control logic)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spritz-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::WakePin`] - Input pins that can wake the processor
//! - [`power::PowerDriver`] - Low-power sleep control
//! - [`power::WakeAlarm`] - One-shot alarm behind [`power::timed_sleep`]
//! - [`wake::WakeSignal`] - Resume signal raised by wake interrupts
//!
//! Blocking delays use [`embedded_hal::delay::DelayNs`] directly.
//!
//! [`embedded_hal::delay::DelayNs`]: https://docs.rs/embedded-hal/1.0.0/embedded_hal/delay/trait.DelayNs.html

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod power;
pub mod wake;

// Re-export key traits at crate root for convenience
pub use gpio::{Edge, InputPin, OutputPin, WakePin};
pub use power::{timed_sleep, PowerDriver, SleepDuration, SleepMode, WakeAlarm};
pub use wake::{WakeReason, WakeSignal};
