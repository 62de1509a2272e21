//! Device state machine
//!
//! Tracks whether the device is idle, sensing light, or spraying, and gates
//! sleep eligibility. The machine is explicit, finite, and deterministic;
//! only the main loop feeds it events.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{DeviceState, StateMachine};
