//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in spritz-core for the freshener's components:
//!
//! - Spray motor (brushed DC motor behind an H-bridge)
//! - Battery voltage sensor (resistor divider on an ADC input)

#![no_std]
#![deny(unsafe_code)]

pub mod motor;
pub mod sensor;
