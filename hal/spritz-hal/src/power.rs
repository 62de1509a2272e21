//! Power domain abstractions
//!
//! Covers selecting a low-power profile and suspending the processor.

use crate::wake::{WakeReason, WakeSignal};

/// Low-power profile entered by [`PowerDriver::sleep`]
///
/// Named after the classic AVR sleep modes; chips map them to the closest
/// equivalent they have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepMode {
    /// CPU clock stopped, peripherals running
    Idle,
    /// Idle with ADC noise reduction
    AdcNoiseReduction,
    /// Everything off except pin-change and watchdog wake
    #[default]
    PowerDown,
    /// Power-down with the async timer kept alive
    PowerSave,
    /// Power-down with the oscillator kept running
    Standby,
    /// Power-save with the oscillator kept running
    ExtendedStandby,
}

/// How long to stay asleep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepDuration {
    /// Until a wake pin fires
    Forever,
    /// Fixed duration in milliseconds (a wake pin may end it early)
    Millis(u32),
}

/// Low-level sleep driver
pub trait PowerDriver {
    /// Select the profile used by subsequent [`sleep`](Self::sleep) calls
    fn set_sleep_mode(&mut self, mode: SleepMode);

    /// Suspend execution
    ///
    /// With [`SleepDuration::Forever`] this returns only after `wake` has
    /// been raised, and returns the reason taken from it. With
    /// [`SleepDuration::Millis`] it returns [`WakeReason::Timer`] when the
    /// time runs out, or the raised reason if `wake` fired first.
    fn sleep(&mut self, duration: SleepDuration, wake: &WakeSignal) -> WakeReason;
}

/// One-shot wake-up alarm used to build timed sleeps
pub trait WakeAlarm {
    /// Free-running microsecond clock
    fn now_us(&mut self) -> u64;

    /// Suspend until any interrupt, arming a wake-up `us` from now
    ///
    /// Called with interrupts masked. No alarm may be left armed on return.
    fn suspend_for(&mut self, us: u32);
}

/// Longest single alarm; longer sleeps are split
pub const MAX_ALARM_US: u32 = 1 << 30;

/// Remaining time below this is polled out instead of armed
pub const MIN_ALARM_US: u32 = 50;

/// Sleep for `ms` or until `wake` is raised
///
/// `service` runs with interrupts masked before each check, so latched
/// wake sources can raise `wake` first. Checking and suspending happen in
/// one critical section; an interrupt landing between them still ends the
/// suspend.
pub fn timed_sleep<A, S>(alarm: &mut A, ms: u32, wake: &WakeSignal, mut service: S) -> WakeReason
where
    A: WakeAlarm,
    S: FnMut(),
{
    let deadline = alarm.now_us().saturating_add(ms as u64 * 1000);
    loop {
        let woke = critical_section::with(|_| {
            service();
            if let Some(reason) = wake.try_take() {
                return Some(reason);
            }
            let now = alarm.now_us();
            if now >= deadline {
                return Some(WakeReason::Timer);
            }
            let remaining = deadline - now;
            if remaining >= MIN_ALARM_US as u64 {
                alarm.suspend_for(remaining.min(MAX_ALARM_US as u64) as u32);
            }
            None
        });
        if let Some(reason) = woke {
            return reason;
        }
    }
}
