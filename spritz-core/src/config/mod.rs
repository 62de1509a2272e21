//! Configuration types
//!
//! Build-time configuration: spray timing presets, LED wiring, sleep policy,
//! input timing and the board pin map. There is no runtime configuration
//! channel; boards declare a `const` [`DeviceConfig`].

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
