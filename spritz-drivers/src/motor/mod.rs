//! Motor driver implementations
//!
//! The spray valve is pushed by a small DC motor on a two-input H-bridge.

pub mod hbridge;

pub use hbridge::HBridgeMotor;
