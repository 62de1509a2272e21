//! Wake signalling between pin interrupts and the sleeping main loop
//!
//! A wake interrupt is a resume signal only. Its handler raises a
//! [`WakeSignal`] and returns; sensors are re-read by the main loop after
//! the sleep call returns.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// What brought the processor out of sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeReason {
    /// Button edge
    Button,
    /// Light sensor edge
    LightSensor,
    /// Timed sleep elapsed
    Timer,
}

/// Resume signal shared between interrupt context and the main loop
///
/// Intended to live in a `static`. Raising overwrites any previous,
/// untaken reason.
pub struct WakeSignal {
    inner: Signal<CriticalSectionRawMutex, WakeReason>,
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeSignal {
    /// Create a cleared signal
    pub const fn new() -> Self {
        Self {
            inner: Signal::new(),
        }
    }

    /// Release a pending sleep (interrupt context safe)
    pub fn raise(&self, reason: WakeReason) {
        self.inner.signal(reason);
    }

    /// Take the pending reason, clearing the signal
    pub fn try_take(&self) -> Option<WakeReason> {
        self.inner.try_take()
    }

    /// Check whether a reason is pending without clearing it
    pub fn is_raised(&self) -> bool {
        self.inner.signaled()
    }

    /// Drop any pending reason
    pub fn reset(&self) {
        self.inner.reset();
    }
}
