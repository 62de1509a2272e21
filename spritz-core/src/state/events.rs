//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Sensor events
    /// Light sensor asserted
    LightOn,
    /// Light sensor released
    LightOff,

    // Spray events
    /// Trigger policy decided to spray
    SprayTriggered,
    /// Pulse sequence returned; carries the light level sampled afterwards
    SprayFinished { light_on: bool },
}
