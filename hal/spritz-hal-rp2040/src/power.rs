//! Sleep driver for the RP2040
//!
//! The RP2040 has no AVR-style sleep modes. Deep profiles set SLEEPDEEP so
//! the clocks listed in CLOCKS.SLEEP_EN are gated while in WFI; light
//! profiles use plain WFI. Dormant mode is not used because it stops the
//! time driver.
//!
//! Timed sleeps use TIMER alarm 1 (the time driver owns alarm 0). Its
//! interrupt only ends WFI: it is taken with interrupts masked and cleared
//! before they are unmasked again, so no handler ever runs.

use cortex_m::peripheral::SCB;
use embassy_rp::interrupt::{self, InterruptExt};
use embassy_rp::pac;
use embassy_time::Instant;
use spritz_hal::{
    timed_sleep, PowerDriver, SleepDuration, SleepMode, WakeAlarm, WakeReason, WakeSignal,
};

use crate::gpio::service_wake_sources;

/// TIMER alarm reserved for timed sleeps
const SLEEP_ALARM: usize = 1;

/// TIMER alarm 1 as a wake-up source
struct TimerAlarm;

impl WakeAlarm for TimerAlarm {
    fn now_us(&mut self) -> u64 {
        Instant::now().as_micros()
    }

    fn suspend_for(&mut self, us: u32) {
        let timer = pac::TIMER;
        let target = timer.timerawl().read().wrapping_add(us);

        timer.intr().write(|w| w.set_alarm(SLEEP_ALARM, true));
        timer.inte().modify(|w| w.set_alarm(SLEEP_ALARM, true));
        timer.alarm(SLEEP_ALARM).write_value(target);
        // Only an enabled interrupt ends WFI while PRIMASK is set.
        // SAFETY: it is disabled and unpended again before the caller's
        // critical section ends, so its vector is never entered.
        unsafe {
            interrupt::TIMER_IRQ_1.enable();
        }

        cortex_m::asm::wfi();

        interrupt::TIMER_IRQ_1.disable();
        timer.armed().write(|w| w.set_armed(1 << SLEEP_ALARM));
        timer.inte().modify(|w| w.set_alarm(SLEEP_ALARM, false));
        timer.intr().write(|w| w.set_alarm(SLEEP_ALARM, true));
        interrupt::TIMER_IRQ_1.unpend();
    }
}

pub struct RpPower {
    scb: SCB,
    mode: SleepMode,
}

impl RpPower {
    pub fn new(scb: SCB) -> Self {
        Self {
            scb,
            mode: SleepMode::Idle,
        }
    }

    pub fn mode(&self) -> SleepMode {
        self.mode
    }
}

fn is_deep(mode: SleepMode) -> bool {
    !matches!(mode, SleepMode::Idle | SleepMode::AdcNoiseReduction)
}

impl PowerDriver for RpPower {
    fn set_sleep_mode(&mut self, mode: SleepMode) {
        self.mode = mode;
        if is_deep(mode) {
            self.scb.set_sleepdeep();
        } else {
            self.scb.clear_sleepdeep();
        }
    }

    fn sleep(&mut self, duration: SleepDuration, wake: &WakeSignal) -> WakeReason {
        match duration {
            SleepDuration::Forever => loop {
                // Checking and suspending with interrupts masked closes the
                // window where an edge lands between the two. A masked
                // interrupt still ends WFI; its handler runs once the
                // section is left.
                let woke = critical_section::with(|_| {
                    service_wake_sources();
                    if let Some(reason) = wake.try_take() {
                        return Some(reason);
                    }
                    cortex_m::asm::wfi();
                    None
                });
                if let Some(reason) = woke {
                    return reason;
                }
            },
            SleepDuration::Millis(ms) => timed_sleep(&mut TimerAlarm, ms, wake, || {
                service_wake_sources();
            }),
        }
    }
}
