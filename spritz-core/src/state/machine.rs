//! State machine definition
//!
//! Motor, LED and sleep behavior is a function of the current state.

use super::events::Event;

/// Device states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// No light sensed, no spray in progress
    #[default]
    Idle,
    /// Light sensor asserted (room in use)
    LightActive,
    /// Pulse sequence in progress
    Spraying,
}

impl DeviceState {
    /// Check if deep sleep may be entered from this state
    pub fn sleep_allowed(&self) -> bool {
        matches!(self, DeviceState::Idle)
    }

    /// Check if a spray may start from this state
    pub fn spray_allowed(&self) -> bool {
        matches!(self, DeviceState::Idle | DeviceState::LightActive)
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: Event) -> Self {
        use DeviceState::*;
        use Event::*;

        match (self, event) {
            // Idle transitions
            (Idle, LightOn) => LightActive,
            (Idle, SprayTriggered) => Spraying,

            // LightActive transitions
            (LightActive, LightOff) => Idle,
            (LightActive, SprayTriggered) => Spraying,

            // Spraying transitions; light edges are resolved by SprayFinished
            (Spraying, SprayFinished { light_on: true }) => LightActive,
            (Spraying, SprayFinished { light_on: false }) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

/// Holder of the process-wide device state
///
/// Created at boot in [`DeviceState::Idle`]. The main loop owns it and is
/// the only caller of [`handle`](Self::handle); everything else reads it.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: DeviceState,
    transitions: u32,
}

impl StateMachine {
    /// Create a machine in the boot state
    pub fn new() -> Self {
        Self {
            state: DeviceState::Idle,
            transitions: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Apply an event, returning the resulting state
    pub fn handle(&mut self, event: Event) -> DeviceState {
        let next = self.state.transition(event);
        if next != self.state {
            debug!("State: {:?} -> {:?} on {:?}", self.state, next, event);
            self.state = next;
            self.transitions = self.transitions.wrapping_add(1);
        } else {
            trace!("State: {:?} ignores {:?}", self.state, event);
        }
        next
    }

    /// Number of state changes since boot
    pub fn transitions(&self) -> u32 {
        self.transitions
    }
}
